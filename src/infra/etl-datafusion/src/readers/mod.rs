// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod ndjson;

use data_utils::data::DataFrameExt;
use datafusion::prelude::*;
use futures::TryStreamExt;
use internal_error::*;
pub use ndjson::*;
use playlog_core::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A common interface for readers of the raw input records
#[async_trait::async_trait]
pub trait Reader: Send + Sync {
    /// Returns a [`DataFrameExt`] that is ready to read the data.
    ///
    /// Note that the dataframe represents a plan, and no records have been
    /// parsed yet when the function returns, so malformed input only surfaces
    /// once the data is consumed.
    async fn read(
        &self,
        ctx: &SessionContext,
        location: &StorageLocation,
    ) -> Result<DataFrameExt, ReadError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fails unless there is at least one object with the given extension under
/// the listing prefix of the location
pub(crate) async fn ensure_input_files(
    ctx: &SessionContext,
    location: &StorageLocation,
    file_extension: &str,
) -> Result<(), ReadError> {
    let store = ctx
        .runtime_env()
        .object_store(location.object_store_url().int_err()?)
        .int_err()?;

    let prefix = location.listing_prefix().int_err()?;
    let mut listing = store.list(Some(&prefix));

    while let Some(meta) = listing.try_next().await.int_err()? {
        if meta.location.as_ref().ends_with(file_extension) {
            return Ok(());
        }
    }

    Err(NoInputFilesError {
        location: location.to_string(),
    }
    .into())
}
