// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use clap::Parser as _;
use indoc::{formatdoc, indoc};
use playlog_cli::*;
use playlog_etl_datafusion::*;
use pretty_assertions::assert_eq;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SONG: &str = r#"{"num_songs": 1, "artist_id": "A1", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "Test Artist", "song_id": "S1", "title": "Test Song", "duration": 200.0, "year": 2000}"#;

const EVENT: &str = r#"{"artist": "Test Artist", "auth": "Logged In", "firstName": "A", "gender": "F", "itemInSession": 0, "lastName": "B", "length": 200.0, "level": "free", "location": "loc", "method": "PUT", "page": "NextSong", "registration": 1.540835983796E12, "sessionId": 100, "song": "Test Song", "status": 200, "ts": 946684800000, "userAgent": "ua", "userId": "1"}"#;

fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_run_from_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("song_data/A/A/A/TRAAA.json"), SONG);
    write_file(&root.join("log_data/2018/11/2018-11-01-events.json"), EVENT);

    let config_path = root.join("playlog.yaml");
    write_file(
        &config_path,
        &formatdoc!(
            "
            source:
              songData: {root}/song_data/*/*/*/*.json
              logData: {root}/log_data/
            output: {root}/out
            engine:
              targetPartitions: 2
            ",
            root = root.display()
        ),
    );

    let args = Cli::try_parse_from([
        "playlog",
        "--config",
        &config_path.display().to_string(),
    ])
    .unwrap();

    let summary = run_pipeline(&args).await.unwrap();

    let counts: Vec<_> = summary
        .writes
        .iter()
        .map(|w| (w.table, w.num_records))
        .collect();
    assert_eq!(
        counts,
        vec![
            (OutputTable::Songs, 1),
            (OutputTable::Artists, 1),
            (OutputTable::Users, 1),
            (OutputTable::Time, 1),
            (OutputTable::Songplays, 1),
        ]
    );

    for table in OutputTable::ALL {
        assert!(
            root.join("out").join(table.name()).is_dir(),
            "Table {table} not written"
        );
    }
    assert!(
        root.join("out/songplays/year=2000/month=1").is_dir(),
        "Songplays not partitioned"
    );
}

#[test_log::test(tokio::test)]
async fn test_run_without_activity_data_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("song_data/A/A/A/TRAAA.json"), SONG);
    std::fs::create_dir_all(root.join("log_data")).unwrap();

    let args = Cli::try_parse_from([
        "playlog",
        "--song-data",
        &root.join("song_data").display().to_string(),
        "--log-data",
        &root.join("log_data").display().to_string(),
        "--output",
        &root.join("out").display().to_string(),
    ])
    .unwrap();

    let err = run_pipeline(&args).await.unwrap_err();

    assert_eq!(err.exit_status(), EXIT_FAILURE);
    assert!(
        err.to_string().starts_with("No input files found at"),
        "{err}"
    );

    // The catalog stage is not rolled back
    assert!(root.join("out/songs").is_dir());
    assert!(!root.join("out/users").exists());
}

#[test_log::test(tokio::test)]
async fn test_run_with_invalid_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("playlog.yaml");
    write_file(
        &config_path,
        indoc!(
            "
            source:
              songData: ftp://example.com/song_data
              logData: /data/log_data
            output: /data/out
            "
        ),
    );

    let args = Cli::try_parse_from([
        "playlog",
        "--config",
        &config_path.display().to_string(),
    ])
    .unwrap();

    let err = run_pipeline(&args).await.unwrap_err();

    assert_eq!(err.exit_status(), EXIT_USAGE_ERROR);
    assert!(
        err.to_string().starts_with("Invalid location 'ftp://example.com/song_data'"),
        "{err}"
    );
}
