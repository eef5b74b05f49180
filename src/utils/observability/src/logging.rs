// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_LOGGING_CONFIG: &str = "info";
pub const VERBOSE_LOGGING_CONFIG: &str = "debug";
pub const VERY_VERBOSE_LOGGING_CONFIG: &str = "trace";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// Bunyan-compatible JSON lines
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub service_name: String,
    pub format: LogFormat,
    pub verbosity_level: u8,
}

impl LoggingConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            format: LogFormat::default(),
            verbosity_level: 0,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        match self.verbosity_level {
            0 => DEFAULT_LOGGING_CONFIG,
            1 => VERBOSE_LOGGING_CONFIG,
            _ => VERY_VERBOSE_LOGGING_CONFIG,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps background log writers alive, dropping it flushes all sinks
#[derive(Default)]
pub struct Guards {
    pub appender: Option<WorkerGuard>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Initializes the global subscriber. All output goes to STDERR so that STDOUT
/// remains reserved for command results.
pub fn init(config: &LoggingConfig) -> Guards {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::layer::SubscriberExt;

    // Logging may be already initialized when running under tests
    if tracing::dispatcher::has_been_set() {
        return Guards::default();
    }

    // Use configuration from RUST_LOG env var if provided
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    match config.format {
        LogFormat::Pretty => {
            let span_events = if config.verbosity_level > 0 {
                FmtSpan::NEW | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };

            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_span_events(span_events)
                .with_writer(std::io::stderr)
                .finish();

            // Redirect all standard logging to tracing events
            let _ = LogTracer::init();
            let _ = tracing::subscriber::set_global_default(subscriber);

            Guards::default()
        }
        LogFormat::Json => {
            let (appender, appender_guard) = tracing_appender::non_blocking(std::io::stderr());

            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(
                    config.service_name.clone(),
                    appender,
                ));

            let _ = LogTracer::init();
            let _ = tracing::subscriber::set_global_default(subscriber);

            Guards {
                appender: Some(appender_guard),
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
