// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Schemas of the raw input records.
//!
//! Inputs are never inferred: a field missing from every record of a shard
//! would otherwise change the column set or its type between runs.

use std::sync::Arc;

use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Column names of the song catalog records
pub mod song_data {
    pub const NUM_SONGS: &str = "num_songs";
    pub const ARTIST_ID: &str = "artist_id";
    pub const ARTIST_LATITUDE: &str = "artist_latitude";
    pub const ARTIST_LONGITUDE: &str = "artist_longitude";
    pub const ARTIST_LOCATION: &str = "artist_location";
    pub const ARTIST_NAME: &str = "artist_name";
    pub const SONG_ID: &str = "song_id";
    pub const TITLE: &str = "title";
    pub const DURATION: &str = "duration";
    pub const YEAR: &str = "year";
}

/// Column names of the user activity records as they appear in the logs
pub mod log_data {
    pub const ARTIST: &str = "artist";
    pub const AUTH: &str = "auth";
    pub const FIRST_NAME: &str = "firstName";
    pub const GENDER: &str = "gender";
    pub const ITEM_IN_SESSION: &str = "itemInSession";
    pub const LAST_NAME: &str = "lastName";
    pub const LENGTH: &str = "length";
    pub const LEVEL: &str = "level";
    pub const LOCATION: &str = "location";
    pub const METHOD: &str = "method";
    pub const PAGE: &str = "page";
    pub const REGISTRATION: &str = "registration";
    pub const SESSION_ID: &str = "sessionId";
    pub const SONG: &str = "song";
    pub const STATUS: &str = "status";
    pub const TS: &str = "ts";
    pub const USER_AGENT: &str = "userAgent";
    pub const USER_ID: &str = "userId";
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn song_data_schema() -> SchemaRef {
    use song_data::*;

    Arc::new(Schema::new(vec![
        Field::new(NUM_SONGS, DataType::Int64, true),
        Field::new(ARTIST_ID, DataType::Utf8, true),
        Field::new(ARTIST_LATITUDE, DataType::Float64, true),
        Field::new(ARTIST_LONGITUDE, DataType::Float64, true),
        Field::new(ARTIST_LOCATION, DataType::Utf8, true),
        Field::new(ARTIST_NAME, DataType::Utf8, true),
        Field::new(SONG_ID, DataType::Utf8, true),
        Field::new(TITLE, DataType::Utf8, true),
        Field::new(DURATION, DataType::Float64, true),
        Field::new(YEAR, DataType::Int32, true),
    ]))
}

pub fn log_data_schema() -> SchemaRef {
    use log_data::*;

    Arc::new(Schema::new(vec![
        Field::new(ARTIST, DataType::Utf8, true),
        Field::new(AUTH, DataType::Utf8, true),
        Field::new(FIRST_NAME, DataType::Utf8, true),
        Field::new(GENDER, DataType::Utf8, true),
        Field::new(ITEM_IN_SESSION, DataType::Int64, true),
        Field::new(LAST_NAME, DataType::Utf8, true),
        Field::new(LENGTH, DataType::Float64, true),
        Field::new(LEVEL, DataType::Utf8, true),
        Field::new(LOCATION, DataType::Utf8, true),
        Field::new(METHOD, DataType::Utf8, true),
        Field::new(PAGE, DataType::Utf8, true),
        Field::new(REGISTRATION, DataType::Float64, true),
        Field::new(SESSION_ID, DataType::Int64, true),
        Field::new(SONG, DataType::Utf8, true),
        Field::new(STATUS, DataType::Int64, true),
        Field::new(TS, DataType::Int64, true),
        Field::new(USER_AGENT, DataType::Utf8, true),
        Field::new(USER_ID, DataType::Utf8, true),
    ]))
}
