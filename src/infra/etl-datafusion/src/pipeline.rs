// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use playlog_core::*;

use crate::activity::process_log_data;
use crate::catalog::process_song_data;
use crate::{EngineSessionProvider, ParquetTableSink};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Runs the catalog stage followed by the activity stage. The first error
/// aborts the run, tables written before it are left as is.
pub struct EtlPipeline {
    session_provider: Arc<EngineSessionProvider>,
    sink: Arc<dyn TableSink>,
}

impl EtlPipeline {
    pub fn new(session_provider: Arc<EngineSessionProvider>, sink: Arc<dyn TableSink>) -> Self {
        Self {
            session_provider,
            sink,
        }
    }

    /// Pipeline that writes Parquet tables under the configured output root
    pub fn from_config(config: PipelineConfig) -> Self {
        let sink = Arc::new(ParquetTableSink::new(config.output.clone()));
        Self::new(Arc::new(EngineSessionProvider::new(config)), sink)
    }

    #[tracing::instrument(level = "info", name = "EtlPipeline::run", skip_all)]
    pub async fn run(&self) -> Result<RunSummary, EtlError> {
        let ctx = self.session_provider.session().await?;
        let config = self.session_provider.config();

        let catalog = process_song_data(&ctx, &config.song_data, self.sink.as_ref()).await?;

        let activity =
            process_log_data(&ctx, &config.log_data, &catalog.lookup, self.sink.as_ref()).await?;

        Ok(RunSummary {
            writes: catalog.writes.into_iter().chain(activity.writes).collect(),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub writes: Vec<WriteSummary>,
}

impl RunSummary {
    pub fn num_records(&self, table: OutputTable) -> Option<u64> {
        self.writes
            .iter()
            .find(|w| w.table == table)
            .map(|w| w.num_records)
    }
}
