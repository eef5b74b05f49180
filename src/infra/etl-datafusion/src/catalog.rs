// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Song catalog stage: songs and artists dimensions plus the lookup used to
//! resolve song plays into catalog ids.

use data_utils::data::DataFrameExt;
use datafusion::prelude::*;
use internal_error::*;
use playlog_core::schema::song_data::*;
use playlog_core::*;

use crate::{Reader, ReaderNdJson, SongLookup};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn songs_table(song_data: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    song_data
        .select_columns(&[SONG_ID, TITLE, ARTIST_ID, YEAR, DURATION])
        .int_err()?
        .distinct()
        .int_err()
}

pub fn artists_table(song_data: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    song_data
        .rename_columns(&[
            (ARTIST_NAME, "name"),
            (ARTIST_LOCATION, "location"),
            (ARTIST_LATITUDE, "latitude"),
            (ARTIST_LONGITUDE, "longitude"),
        ])
        .int_err()?
        .select_columns(&[ARTIST_ID, "name", "location", "latitude", "longitude"])
        .int_err()?
        .distinct()
        .int_err()
}

pub fn song_lookup_table(song_data: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    song_data
        .select_columns(&[SONG_ID, TITLE, ARTIST_ID, ARTIST_NAME])
        .int_err()?
        .distinct()
        .int_err()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Plans of all tables derived from the song catalog, nothing is executed yet
#[derive(Debug, Clone)]
pub struct CatalogTables {
    pub songs: DataFrameExt,
    pub artists: DataFrameExt,
    pub lookup: DataFrameExt,
}

impl CatalogTables {
    pub fn from_song_data(song_data: DataFrameExt) -> Result<Self, InternalError> {
        Ok(Self {
            songs: songs_table(song_data.clone())?,
            artists: artists_table(song_data.clone())?,
            lookup: song_lookup_table(song_data)?,
        })
    }
}

#[derive(Debug)]
pub struct CatalogOutput {
    pub lookup: SongLookup,
    pub writes: Vec<WriteSummary>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[tracing::instrument(level = "info", skip_all, fields(%input))]
pub async fn process_song_data(
    ctx: &SessionContext,
    input: &StorageLocation,
    sink: &dyn TableSink,
) -> Result<CatalogOutput, EtlError> {
    let song_data = ReaderNdJson::song_data().read(ctx, input).await?;
    let tables = CatalogTables::from_song_data(song_data)?;

    let lookup = SongLookup::materialize(ctx, tables.lookup).await?;

    let songs = sink.write(OutputTable::Songs, tables.songs).await?;
    let artists = sink.write(OutputTable::Artists, tables.artists).await?;

    tracing::info!(
        num_songs = songs.num_records,
        num_artists = artists.num_records,
        "Finished processing song data"
    );

    Ok(CatalogOutput {
        lookup,
        writes: vec![songs, artists],
    })
}
