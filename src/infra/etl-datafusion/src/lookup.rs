// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use data_utils::data::DataFrameExt;
use datafusion::prelude::*;
use internal_error::*;
use playlog_core::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Name under which the lookup is registered in the engine session
pub const SONG_LOOKUP_TABLE: &str = "song_artist_lookup";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fully materialized `(song_id, title, artist_id, artist_name)` mapping that
/// resolves song plays to catalog ids.
///
/// The activity stage receives it as an explicit argument. It is also
/// registered in the session as [`SONG_LOOKUP_TABLE`] so it can be inspected
/// with SQL.
#[derive(Debug, Clone)]
pub struct SongLookup {
    data: DataFrameExt,
}

impl SongLookup {
    #[tracing::instrument(level = "info", name = "SongLookup::materialize", skip_all)]
    pub async fn materialize(
        ctx: &SessionContext,
        lookup: DataFrameExt,
    ) -> Result<Self, TransformError> {
        let data = lookup.cache().await.int_err()?;

        ctx.deregister_table(SONG_LOOKUP_TABLE).int_err()?;
        ctx.register_table(SONG_LOOKUP_TABLE, data.clone().into_view())
            .int_err()?;

        Ok(Self { data })
    }

    /// Resolves the lookup registered by an earlier catalog stage of the same
    /// session
    pub async fn from_session(ctx: &SessionContext) -> Result<Self, TransformError> {
        if !ctx.table_exist(SONG_LOOKUP_TABLE).int_err()? {
            return Err(MissingDependencyError::new(SONG_LOOKUP_TABLE).into());
        }

        let data = ctx.table(SONG_LOOKUP_TABLE).await.int_err()?;

        Ok(Self { data: data.into() })
    }

    pub fn data(&self) -> DataFrameExt {
        self.data.clone()
    }
}
