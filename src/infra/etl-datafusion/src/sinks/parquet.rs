// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use data_utils::data::DataFrameExt;
use datafusion::arrow::datatypes::DataType;
use datafusion::config::TableParquetOptions;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::execution::TaskContext;
use datafusion::prelude::*;
use futures::{StreamExt, TryStreamExt};
use internal_error::*;
use playlog_core::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Directory value used for null and empty partition keys
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

const PARQUET_COMPRESSION: &str = "snappy";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Writes every table as a directory of Parquet files under the output root,
/// Hive-style partitioned (`year=2000/month=1/...`) where the table defines
/// partition columns.
///
/// Object stores are resolved through the session of the written dataframe.
pub struct ParquetTableSink {
    root: StorageLocation,
}

impl ParquetTableSink {
    pub fn new(root: StorageLocation) -> Self {
        Self { root }
    }

    pub fn table_location(&self, table: OutputTable) -> StorageLocation {
        self.root.join(table.name())
    }

    /// Deletes all previous table data. Local tables are removed together
    /// with their partition directories, which are not objects of their own.
    #[tracing::instrument(level = "debug", skip_all, fields(%location))]
    async fn clear(
        &self,
        task_ctx: &TaskContext,
        location: &StorageLocation,
    ) -> Result<(), WriteError> {
        if let StorageLocation::Local(path) = location {
            return match tokio::fs::remove_dir_all(path).await {
                Ok(()) => {
                    tracing::debug!("Removed previous table directory");
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.int_err().with_context(location.to_string()).into()),
            };
        }

        let store = task_ctx
            .runtime_env()
            .object_store(location.object_store_url()?)
            .int_err()?;

        let prefix = location.listing_prefix()?;

        let paths = store
            .list(Some(&prefix))
            .map_ok(|meta| meta.location)
            .boxed();

        let deleted: Vec<_> = store.delete_stream(paths).try_collect().await.int_err()?;

        tracing::debug!(num_deleted = deleted.len(), "Removed previous table data");
        Ok(())
    }

    fn writer_options() -> TableParquetOptions {
        let mut options = TableParquetOptions::default();
        options.global.compression = Some(PARQUET_COMPRESSION.to_string());
        options
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl TableSink for ParquetTableSink {
    #[tracing::instrument(level = "info", name = "ParquetTableSink::write", skip_all, fields(%table))]
    async fn write(
        &self,
        table: OutputTable,
        data: DataFrameExt,
    ) -> Result<WriteSummary, WriteError> {
        let location = self.table_location(table);

        self.clear(&data.task_ctx(), &location).await?;

        let partition_columns = table.partition_columns();
        let data = with_partition_values(data, partition_columns)?;

        let options = DataFrameWriteOptions::new().with_partition_by(
            partition_columns
                .iter()
                .map(ToString::to_string)
                .collect(),
        );

        let batches = data
            .write_parquet(
                &location.to_table_url(),
                options,
                Some(Self::writer_options()),
            )
            .await
            .int_err()?;

        let num_records = DataFrameExt::num_rows_written(&batches).int_err()?;

        tracing::info!(num_records, %location, "Table written");

        Ok(WriteSummary {
            table,
            num_records,
            location: location.to_string(),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Converts partition columns into directory values: strings, where null and
/// empty values are replaced by [`HIVE_DEFAULT_PARTITION`]
fn with_partition_values(
    data: DataFrameExt,
    partition_columns: &[&str],
) -> Result<DataFrameExt, InternalError> {
    partition_columns
        .iter()
        .try_fold(data, |df, name| {
            let value = nullif(cast(col(*name), DataType::Utf8), lit(""));
            df.with_column(name, coalesce(vec![value, lit(HIVE_DEFAULT_PARTITION)]))
        })
        .int_err()
}
