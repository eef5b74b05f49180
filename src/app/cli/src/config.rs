// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use internal_error::*;
use playlog_etl_datafusion::*;

use crate::CLIError;
use crate::cli::Cli;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_CONFIG_FILE: &str = "playlog.yaml";

pub const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_AWS_REGION: &str = "AWS_REGION";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Combines the configuration layers of a run. Later layers win:
/// config file, then environment, then command line flags.
pub struct ConfigLoader<'a> {
    cli: &'a Cli,
    env: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replaces process environment lookups
    pub fn with_env(self, env: impl Fn(&str) -> Option<String> + 'a) -> Self {
        Self {
            env: Box::new(env),
            ..self
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn load(&self) -> Result<PipelineConfig, CLIError> {
        let file_config = self.file_config()?;

        let config = file_config
            .merge(self.env_config())
            .merge(self.cli_config());

        tracing::debug!(?config, "Loaded configuration");

        Ok(config.validate()?)
    }

    fn file_config(&self) -> Result<EtlConfig, CLIError> {
        match &self.cli.config {
            Some(path) => {
                if !path.is_file() {
                    return Err(CLIError::usage_error(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                load_config_file(path)
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    load_config_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "Default config file not present");
                    Ok(EtlConfig::default())
                }
            }
        }
    }

    fn env_config(&self) -> EtlConfig {
        EtlConfig {
            credentials: CredentialsConfig {
                access_key_id: (self.env)(ENV_AWS_ACCESS_KEY_ID),
                secret_access_key: (self.env)(ENV_AWS_SECRET_ACCESS_KEY),
                region: (self.env)(ENV_AWS_REGION),
                endpoint: None,
            },
            ..Default::default()
        }
    }

    fn cli_config(&self) -> EtlConfig {
        EtlConfig {
            source: SourceConfig {
                song_data: self.cli.song_data.clone(),
                log_data: self.cli.log_data.clone(),
            },
            output: self.cli.output.clone(),
            ..Default::default()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn load_config_file(path: &Path) -> Result<EtlConfig, CLIError> {
    tracing::info!(path = %path.display(), "Loading config file");

    let contents = std::fs::read_to_string(path)
        .context_int_err(format!("Failed to read config file {}", path.display()))?;

    serde_yaml::from_str(&contents).map_err(|e| {
        CLIError::usage_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}
