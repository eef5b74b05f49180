// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use datafusion::prelude::*;
use playlog_etl_datafusion::*;
use tempfile::TempDir;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// 2000-01-01T00:00:00Z
pub const TS_2000_01_01: i64 = 946_684_800_000;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Local input and output trees of a pipeline run
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let song_data_dir = temp_dir.path().join("song_data");
        let log_data_dir = temp_dir.path().join("log_data");
        let output_dir = temp_dir.path().join("out");

        std::fs::create_dir_all(&song_data_dir).unwrap();
        std::fs::create_dir_all(&log_data_dir).unwrap();

        Self {
            temp_dir,
            song_data_dir,
            log_data_dir,
            output_dir,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::new(
            StorageLocation::Local(self.song_data_dir.clone()),
            StorageLocation::Local(self.log_data_dir.clone()),
            StorageLocation::Local(self.output_dir.clone()),
        )
    }

    pub fn session_provider(&self) -> Arc<EngineSessionProvider> {
        Arc::new(EngineSessionProvider::new(self.config()))
    }

    pub async fn session(&self) -> SessionContext {
        self.session_provider().session().await.unwrap()
    }

    /// Writes catalog records, one file per record, e.g. `A/B/C/TRAAA.json`
    pub fn add_songs(&self, rel_path: &str, records: &[String]) {
        write_records(&self.song_data_dir.join(rel_path), records);
    }

    /// Writes activity records into a single file, e.g. `2018/11/events.json`
    pub fn add_events(&self, rel_path: &str, records: &[String]) {
        write_records(&self.log_data_dir.join(rel_path), records);
    }

    pub fn clear_inputs(&self) {
        for dir in [&self.song_data_dir, &self.log_data_dir] {
            std::fs::remove_dir_all(dir).unwrap();
            std::fs::create_dir_all(dir).unwrap();
        }
    }

    pub fn song_data(&self) -> StorageLocation {
        StorageLocation::Local(self.song_data_dir.clone())
    }

    pub fn log_data(&self) -> StorageLocation {
        StorageLocation::Local(self.log_data_dir.clone())
    }
}

pub fn write_records(path: &Path, records: &[String]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, records.join("\n")).unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn song_json(song_id: &str, title: &str, artist_id: &str, artist_name: &str, year: i32) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": 40.7, "artist_longitude": -74.0, "artist_location": "NYC", "artist_name": "{artist_name}", "song_id": "{song_id}", "title": "{title}", "duration": 200.0, "year": {year}}}"#
    )
}

pub fn event_json(
    page: &str,
    ts: i64,
    user_id: &str,
    level: &str,
    artist: Option<&str>,
    song: Option<&str>,
) -> String {
    format!(
        r#"{{"artist": {}, "auth": "Logged In", "firstName": "A", "gender": "F", "itemInSession": 0, "lastName": "B", "length": 200.0, "level": "{level}", "location": "loc", "method": "PUT", "page": "{page}", "registration": 1.540835983796E12, "sessionId": 100, "song": {}, "status": 200, "ts": {ts}, "userAgent": "ua", "userId": "{user_id}"}}"#,
        json_str(artist),
        json_str(song),
    )
}

fn json_str(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("\"{v}\""),
        None => "null".to_string(),
    }
}

pub fn scenario_song() -> String {
    song_json("S1", "Test Song", "A1", "Test Artist", 2000)
}

pub fn scenario_event(page: &str) -> String {
    event_json(
        page,
        TS_2000_01_01,
        "1",
        "free",
        Some("Test Artist"),
        Some("Test Song"),
    )
}
