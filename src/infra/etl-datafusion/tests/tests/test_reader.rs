// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use data_utils::testing::*;
use datafusion::prelude::*;
use indoc::indoc;
use playlog_etl_datafusion::*;

use crate::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_read_song_data_recursively() {
    let harness = TestHarness::new();
    harness.add_songs("A/B/C/TRAAA.json", &[scenario_song()]);
    harness.add_songs(
        "A/B/D/TRAAB.json",
        &[song_json("S2", "Another Song", "A1", "Test Artist", 2001)],
    );
    harness.add_songs("A/README.md", &["not a record".to_string()]);

    let ctx = harness.session().await;
    let df = ReaderNdJson::song_data()
        .read(&ctx, &harness.song_data())
        .await
        .unwrap();

    assert_schema_eq(
        df.schema(),
        indoc!(
            "
            num_songs: Int64?
            artist_id: Utf8?
            artist_latitude: Float64?
            artist_longitude: Float64?
            artist_location: Utf8?
            artist_name: Utf8?
            song_id: Utf8?
            title: Utf8?
            duration: Float64?
            year: Int32?
            "
        ),
    );

    assert_eq!(num_rows(df).await, 2);
}

#[test_log::test(tokio::test)]
async fn test_read_local_glob() {
    let harness = TestHarness::new();
    harness.add_songs("A/B/C/TRAAA.json", &[scenario_song()]);
    harness.add_songs(
        "A/B/TRAAB.json",
        &[song_json("S2", "Another Song", "A1", "Test Artist", 2001)],
    );

    let ctx = harness.session().await;
    let location = StorageLocation::parse(&format!(
        "{}/*/*/*/*.json",
        harness.song_data_dir.display()
    ))
    .unwrap();

    let df = ReaderNdJson::song_data()
        .read(&ctx, &location)
        .await
        .unwrap()
        .select_columns(&["song_id"])
        .unwrap();

    assert_data_eq(
        df,
        indoc!(
            "
            +---------+
            | song_id |
            +---------+
            | S1      |
            +---------+
            "
        ),
    )
    .await;
}

#[test_log::test(tokio::test)]
async fn test_read_absent_and_unknown_fields() {
    let harness = TestHarness::new();
    harness.add_events(
        "2018/11/events.json",
        &[scenario_event("NextSong"), scenario_event("Home")],
    );
    harness.add_songs(
        "A/B/C/TRAAA.json",
        &[
            scenario_song(),
            r#"{"song_id": "S2", "title": "Other", "unknown_field": 123}"#.to_string(),
        ],
    );

    let ctx = harness.session().await;

    let df = ReaderNdJson::song_data()
        .read(&ctx, &harness.song_data())
        .await
        .unwrap()
        .select_columns(&["song_id", "title", "artist_location", "year"])
        .unwrap();

    assert_data_eq_unordered(
        df,
        indoc!(
            "
            +---------+-----------+-----------------+------+
            | song_id | title     | artist_location | year |
            +---------+-----------+-----------------+------+
            | S1      | Test Song | NYC             | 2000 |
            | S2      | Other     |                 |      |
            +---------+-----------+-----------------+------+
            "
        ),
    )
    .await;

    let df = ReaderNdJson::log_data()
        .read(&ctx, &harness.log_data())
        .await
        .unwrap()
        .filter(col("page").eq(lit("Home")))
        .unwrap();

    assert_eq!(num_rows(df).await, 1);
}

#[test_log::test(tokio::test)]
async fn test_read_no_input_files() {
    let harness = TestHarness::new();
    harness.add_events("2018/11/notes.txt", &["nothing here".to_string()]);

    let ctx = harness.session().await;

    let res = ReaderNdJson::log_data()
        .read(&ctx, &harness.log_data())
        .await;
    assert!(
        matches!(res, Err(ReadError::NoInputFiles(_))),
        "Unexpected result: {res:?}"
    );

    let missing = StorageLocation::Local(harness.temp_dir.path().join("does-not-exist"));
    let res = ReaderNdJson::song_data().read(&ctx, &missing).await;
    assert!(
        matches!(res, Err(ReadError::NoInputFiles(_))),
        "Unexpected result: {res:?}"
    );
}
