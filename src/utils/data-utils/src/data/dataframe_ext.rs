// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use datafusion::arrow::array::{AsArray, RecordBatch};
use datafusion::arrow::datatypes::UInt64Type;
use datafusion::catalog::TableProvider;
use datafusion::common::{Column, DFSchema};
use datafusion::config::TableParquetOptions;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::error::{DataFusionError, Result};
use datafusion::execution::TaskContext;
use datafusion::prelude::*;
use tracing::Instrument as _;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Tracing and extensions wrapper for [`DataFrame`]
#[derive(Clone)]
pub struct DataFrameExt(DataFrame);

impl From<DataFrame> for DataFrameExt {
    fn from(value: DataFrame) -> Self {
        Self(value)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Wrapper methods
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl DataFrameExt {
    #[tracing::instrument(level = "info", name = "DataFrame::cache", skip_all)]
    pub async fn cache(self) -> Result<Self, DataFusionError> {
        self.0.cache().await.map(Self)
    }

    #[tracing::instrument(level = "info", name = "DataFrame::collect", skip_all)]
    pub async fn collect(self) -> Result<Vec<RecordBatch>, DataFusionError> {
        let task_ctx = Arc::new(self.0.task_ctx());

        let plan = self
            .0
            .create_physical_plan()
            .instrument(tracing::debug_span!("DataFrame::create_physical_plan").or_current())
            .await?;

        datafusion::physical_plan::collect(plan, task_ctx)
            .instrument(tracing::debug_span!("PhysicalPlan::collect").or_current())
            .await
    }

    pub fn distinct(self) -> Result<Self, DataFusionError> {
        self.0.distinct().map(Self)
    }

    pub fn filter(self, predicate: Expr) -> Result<Self, DataFusionError> {
        self.0.filter(predicate).map(Self)
    }

    pub fn into_inner(self) -> DataFrame {
        self.0
    }

    pub fn into_view(self) -> Arc<dyn TableProvider> {
        self.0.into_view()
    }

    pub fn join(
        self,
        right: DataFrameExt,
        join_type: JoinType,
        left_cols: &[&str],
        right_cols: &[&str],
        filter: Option<Expr>,
    ) -> Result<Self, DataFusionError> {
        self.0
            .join(right.into_inner(), join_type, left_cols, right_cols, filter)
            .map(Self)
    }

    pub fn schema(&self) -> &DFSchema {
        self.0.schema()
    }

    pub fn select(self, expr_list: Vec<Expr>) -> Result<Self, DataFusionError> {
        self.0.select(expr_list).map(Self)
    }

    pub fn select_columns(self, columns: &[&str]) -> Result<Self, DataFusionError> {
        self.0.select_columns(columns).map(Self)
    }

    pub fn task_ctx(&self) -> TaskContext {
        self.0.task_ctx()
    }

    pub fn with_column(self, name: &str, expr: Expr) -> Result<Self, DataFusionError> {
        self.0.with_column(name, expr).map(Self)
    }

    pub fn window(self, window_exprs: Vec<Expr>) -> Result<Self, DataFusionError> {
        self.0.window(window_exprs).map(Self)
    }

    #[tracing::instrument(level = "info", name = "DataFrame::write_parquet", skip_all, fields(%path))]
    pub async fn write_parquet(
        self,
        path: &str,
        options: DataFrameWriteOptions,
        writer_options: Option<TableParquetOptions>,
    ) -> Result<Vec<RecordBatch>, DataFusionError> {
        self.0.write_parquet(path, options, writer_options).await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Extension methods
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl DataFrameExt {
    pub fn has_column(&self, name: &str) -> bool {
        self.schema().has_column_with_unqualified_name(name)
    }

    /// Renames columns by exact (case-sensitive) name in a single projection.
    /// Renaming a column that does not exist is a no-op.
    pub fn rename_columns(self, renames: &[(&str, &str)]) -> Result<Self> {
        if !renames.iter().any(|(old_name, _)| self.has_column(old_name)) {
            return Ok(self);
        }

        let columns: Vec<_> = self
            .schema()
            .iter()
            .map(|(qualifier, field)| {
                let column = col(Column::new(qualifier.cloned(), field.name()));
                match renames.iter().find(|(old_name, _)| *old_name == field.name().as_str()) {
                    Some((_, new_name)) => column.alias(*new_name),
                    None => column,
                }
            })
            .collect();

        self.select(columns)
    }

    pub fn without_columns(self, cols: &[&str]) -> Result<Self> {
        let columns: Vec<_> = self
            .schema()
            .iter()
            .filter(|(_, field)| !cols.contains(&field.name().as_str()))
            .map(|(qualifier, field)| col(Column::new(qualifier.cloned(), field.name())))
            .collect();

        self.select(columns)
    }

    /// Sums up the `count` column of the batches returned by `DataFusion` write
    /// operations
    pub fn num_rows_written(batches: &[RecordBatch]) -> Result<u64> {
        let mut total = 0;

        for batch in batches {
            let Some(count) = batch.column_by_name("count") else {
                return Err(DataFusionError::Internal(format!(
                    "Expected write result to contain 'count' column but got schema: {:?}",
                    batch.schema()
                )));
            };

            let Some(count) = count.as_primitive_opt::<UInt64Type>() else {
                return Err(DataFusionError::Internal(format!(
                    "Expected write result 'count' column to be UInt64 but got {:?}",
                    count.data_type()
                )));
            };

            total += count.iter().flatten().sum::<u64>();
        }

        Ok(total)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Debug for DataFrameExt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
