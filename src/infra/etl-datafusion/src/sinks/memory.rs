// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use data_utils::data::DataFrameExt;
use datafusion::arrow::array::RecordBatch;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use internal_error::*;
use playlog_core::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps written tables in memory, replacing them on every write
pub struct MemoryTableSink {
    ctx: SessionContext,
    tables: Mutex<BTreeMap<OutputTable, (SchemaRef, Vec<RecordBatch>)>>,
}

impl MemoryTableSink {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            tables: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn written_tables(&self) -> Vec<OutputTable> {
        self.tables.lock().unwrap().keys().copied().collect()
    }

    /// Returns the last written contents of the table
    pub fn table(&self, table: OutputTable) -> Option<DataFrameExt> {
        let (schema, batches) = self.tables.lock().unwrap().get(&table)?.clone();
        let provider = MemTable::try_new(schema, vec![batches]).unwrap();
        Some(self.ctx.read_table(Arc::new(provider)).unwrap().into())
    }
}

#[async_trait::async_trait]
impl TableSink for MemoryTableSink {
    async fn write(
        &self,
        table: OutputTable,
        data: DataFrameExt,
    ) -> Result<WriteSummary, WriteError> {
        let plan_schema = data.schema().inner().clone();
        let batches = data.collect().await.int_err()?;
        let schema = batches
            .first()
            .map(RecordBatch::schema)
            .unwrap_or(plan_schema);
        let num_records: usize = batches.iter().map(RecordBatch::num_rows).sum();

        self.tables
            .lock()
            .unwrap()
            .insert(table, (schema, batches));

        Ok(WriteSummary {
            table,
            num_records: num_records as u64,
            location: format!("memory://{table}"),
        })
    }
}
