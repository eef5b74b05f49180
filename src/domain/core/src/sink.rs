// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use data_utils::data::DataFrameExt;

use crate::{OutputTable, WriteError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Destination of the output tables.
///
/// A write executes the plan behind the dataframe and blocks until the table
/// is fully persisted. Every write replaces all previous contents of the
/// table.
#[async_trait::async_trait]
pub trait TableSink: Send + Sync {
    async fn write(
        &self,
        table: OutputTable,
        data: DataFrameExt,
    ) -> Result<WriteSummary, WriteError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub table: OutputTable,
    pub num_records: u64,
    /// Human readable location of the written table
    pub location: String,
}
