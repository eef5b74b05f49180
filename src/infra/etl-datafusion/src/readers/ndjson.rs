// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use data_utils::data::DataFrameExt;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::prelude::*;
use internal_error::*;
use playlog_core::schema::{log_data_schema, song_data_schema};
use playlog_core::*;

use crate::Reader;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const FILE_EXTENSION: &str = ".json";

/// Reads newline-delimited JSON records with an explicit schema. Fields
/// absent from a record are read as nulls, unknown fields are ignored.
pub struct ReaderNdJson {
    schema: SchemaRef,
}

impl ReaderNdJson {
    pub fn new(schema: SchemaRef) -> Self {
        Self { schema }
    }

    pub fn song_data() -> Self {
        Self::new(song_data_schema())
    }

    pub fn log_data() -> Self {
        Self::new(log_data_schema())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Reader for ReaderNdJson {
    #[tracing::instrument(level = "info", name = "ReaderNdJson::read", skip_all, fields(%location))]
    async fn read(
        &self,
        ctx: &SessionContext,
        location: &StorageLocation,
    ) -> Result<DataFrameExt, ReadError> {
        super::ensure_input_files(ctx, location, FILE_EXTENSION).await?;

        let options = NdJsonReadOptions {
            schema: Some(self.schema.as_ref()),
            file_extension: FILE_EXTENSION,
            ..Default::default()
        };

        let df = ctx
            .read_json(location.to_table_url(), options)
            .await
            .int_err()?;

        Ok(df.into())
    }
}
