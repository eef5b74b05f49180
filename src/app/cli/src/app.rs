// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use observability::logging::LoggingConfig;
use playlog_etl_datafusion::*;

use crate::cli::Cli;
use crate::{CLIError, ConfigLoader};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "playlog";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(args: Cli) -> Result<RunSummary, CLIError> {
    let guards = configure_logging(&args);
    observability::panic_handler::set_hook_trace_panics(true);

    tracing::info!(
        version = VERSION,
        args = ?std::env::args().collect::<Vec<_>>(),
        "Initializing {BINARY_NAME}"
    );

    let result = run_pipeline(&args).await;

    match &result {
        Ok(summary) => {
            for write in &summary.writes {
                tracing::info!(
                    table = %write.table,
                    num_records = write.num_records,
                    location = %write.location,
                    "Table summary"
                );
            }
            tracing::info!("Run successful");
        }
        Err(err) => {
            tracing::error!(
                error_dbg = ?err,
                error = %err.pretty(true),
                "Run failed",
            );

            if args.verbose == 0 {
                eprintln!("{}", err.pretty(false));
            }
        }
    }

    // Flush all logging sinks
    drop(guards);

    result
}

/// Loads configuration and runs the pipeline without touching global state
pub async fn run_pipeline(args: &Cli) -> Result<RunSummary, CLIError> {
    let config = ConfigLoader::new(args).load()?;
    run_with_config(config).await
}

pub async fn run_with_config(config: PipelineConfig) -> Result<RunSummary, CLIError> {
    tracing::info!(
        song_data = %config.song_data,
        log_data = %config.log_data,
        output = %config.output,
        "Starting pipeline"
    );

    Ok(EtlPipeline::from_config(config).run().await?)
}

fn configure_logging(args: &Cli) -> observability::logging::Guards {
    let mut config = LoggingConfig::new(BINARY_NAME);
    config.format = args.log_format.into();
    config.verbosity_level = args.verbose;

    observability::logging::init(&config)
}
