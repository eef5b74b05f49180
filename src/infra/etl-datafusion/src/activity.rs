// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! User activity stage: users and time dimensions and the songplays fact
//! table.

use data_utils::data::DataFrameExt;
use datafusion::arrow::datatypes::{DataType, TimeUnit};
use datafusion::functions_window::expr_fn::row_number;
use datafusion::prelude::*;
use internal_error::*;
use playlog_core::schema::log_data;
use playlog_core::*;

use crate::{Reader, ReaderNdJson, SongLookup};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Page of the events that represent a song being played
pub const NEXT_SONG_PAGE: &str = "NextSong";

pub const START_TIME: &str = "start_time";
pub const SONGPLAY_ID: &str = "songplay_id";

const COLUMN_RENAMES: [(&str, &str); 6] = [
    ("songId", "song_id"),
    (log_data::SESSION_ID, "session_id"),
    (log_data::USER_ID, "user_id"),
    (log_data::FIRST_NAME, "first_name"),
    (log_data::LAST_NAME, "last_name"),
    (log_data::USER_AGENT, "user_agent"),
];

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Renames camel-case log fields to snake-case, absent fields are skipped
pub fn normalize_columns(log_data: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    log_data.rename_columns(&COLUMN_RENAMES).int_err()
}

pub fn song_plays(events: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    events
        .filter(col(log_data::PAGE).eq(lit(NEXT_SONG_PAGE)))
        .int_err()
}

/// Exact-row deduplication: a user whose level changed is kept once per level
pub fn users_table(events: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    events
        .select_columns(&["user_id", "first_name", "last_name", "gender", "level"])
        .int_err()?
        .distinct()
        .int_err()
}

/// Adds `start_time` derived from the `ts` epoch milliseconds along with its
/// `year` and `month` used for partitioning
pub fn with_start_time(events: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    let start_time_type = DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()));

    events
        .with_column(START_TIME, cast(col(log_data::TS), start_time_type))
        .int_err()?
        .with_column("year", time_part("year"))
        .int_err()?
        .with_column("month", time_part("month"))
        .int_err()
}

pub fn time_table(events: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    // ISO-8601: Monday = 1 .. Sunday = 7
    let weekday = (time_part("dow") + lit(6)) % lit(7) + lit(1);

    events
        .select_columns(&[START_TIME, "year", "month"])
        .int_err()?
        .distinct()
        .int_err()?
        .with_column("hour", time_part("hour"))
        .int_err()?
        .with_column("day", time_part("day"))
        .int_err()?
        // ISO-8601 week of the year
        .with_column("week", time_part("week"))
        .int_err()?
        .with_column("weekday", weekday)
        .int_err()
}

/// Numbers events sequentially starting from 1. The numbering is only unique
/// within a run and carries no relation to event time.
pub fn with_songplay_id(events: DataFrameExt) -> Result<DataFrameExt, InternalError> {
    events
        .window(vec![row_number().alias(SONGPLAY_ID)])
        .int_err()
}

/// Joins song play events with the catalog on the exact `(artist, song)` pair.
/// Events without a match are dropped.
pub fn songplays_table(
    events: DataFrameExt,
    lookup: &SongLookup,
) -> Result<DataFrameExt, InternalError> {
    with_songplay_id(events)?
        .join(
            lookup.data(),
            JoinType::Inner,
            &[log_data::ARTIST, log_data::SONG],
            &["artist_name", "title"],
            None,
        )
        .int_err()?
        .select_columns(&[
            SONGPLAY_ID,
            START_TIME,
            "user_id",
            "level",
            "song_id",
            "artist_id",
            "session_id",
            "location",
            "user_agent",
            "year",
            "month",
        ])
        .int_err()
}

fn time_part(part: &str) -> Expr {
    cast(date_part(lit(part), col(START_TIME)), DataType::Int32)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct ActivityOutput {
    pub writes: Vec<WriteSummary>,
}

#[tracing::instrument(level = "info", skip_all, fields(%input))]
pub async fn process_log_data(
    ctx: &SessionContext,
    input: &StorageLocation,
    lookup: &SongLookup,
    sink: &dyn TableSink,
) -> Result<ActivityOutput, EtlError> {
    let log_data = ReaderNdJson::log_data().read(ctx, input).await?;
    let events = song_plays(normalize_columns(log_data)?)?;

    let users = sink
        .write(OutputTable::Users, users_table(events.clone())?)
        .await?;

    let events = with_start_time(events)?;

    let time = sink
        .write(OutputTable::Time, time_table(events.clone())?)
        .await?;

    let songplays = sink
        .write(OutputTable::Songplays, songplays_table(events, lookup)?)
        .await?;

    tracing::info!(
        num_users = users.num_records,
        num_timestamps = time.num_records,
        num_songplays = songplays.num_records,
        "Finished processing log data"
    );

    Ok(ActivityOutput {
        writes: vec![users, time, songplays],
    })
}
