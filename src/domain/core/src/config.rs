// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const REDACTED: &str = "<redacted>";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Configuration as it is read from file, environment and command line.
///
/// All values are optional at this stage, layers are combined with
/// [`EtlConfig::merge`] and then checked by [`EtlConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EtlConfig {
    #[serde(default)]
    pub source: SourceConfig,

    /// Root under which every output table gets its own directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceConfig {
    /// Song catalog records: a directory or a local glob
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_data: Option<String>,

    /// User activity records: a directory or a local glob
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_data: Option<String>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint, e.g. a local `MinIO` instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| REDACTED))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| REDACTED),
            )
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of partitions the engine splits work into, defaults to the
    /// number of CPU cores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_partitions: Option<usize>,

    /// Number of rows in record batches produced by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl EtlConfig {
    /// Returns a config where every value set in `overrides` replaces the
    /// value in `self`
    pub fn merge(self, overrides: EtlConfig) -> EtlConfig {
        EtlConfig {
            source: SourceConfig {
                song_data: overrides.source.song_data.or(self.source.song_data),
                log_data: overrides.source.log_data.or(self.source.log_data),
            },
            output: overrides.output.or(self.output),
            credentials: CredentialsConfig {
                access_key_id: overrides
                    .credentials
                    .access_key_id
                    .or(self.credentials.access_key_id),
                secret_access_key: overrides
                    .credentials
                    .secret_access_key
                    .or(self.credentials.secret_access_key),
                region: overrides.credentials.region.or(self.credentials.region),
                endpoint: overrides.credentials.endpoint.or(self.credentials.endpoint),
            },
            engine: EngineConfig {
                target_partitions: overrides
                    .engine
                    .target_partitions
                    .or(self.engine.target_partitions),
                batch_size: overrides.engine.batch_size.or(self.engine.batch_size),
            },
        }
    }

    pub fn validate(&self) -> Result<PipelineConfig, ConfigError> {
        let song_data = parse_location("source.songData", self.source.song_data.as_deref())?;
        let log_data = parse_location("source.logData", self.source.log_data.as_deref())?;
        let output = parse_location("output", self.output.as_deref())?;

        if output.has_glob() {
            return Err(InvalidConfigValueError {
                key: "output".to_string(),
                reason: "output location cannot be a glob pattern".to_string(),
            }
            .into());
        }

        for (key, value) in [
            ("engine.targetPartitions", self.engine.target_partitions),
            ("engine.batchSize", self.engine.batch_size),
        ] {
            if value == Some(0) {
                return Err(InvalidConfigValueError {
                    key: key.to_string(),
                    reason: "must be greater than zero".to_string(),
                }
                .into());
            }
        }

        let credentials = match (
            &self.credentials.access_key_id,
            &self.credentials.secret_access_key,
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                region: self.credentials.region.clone(),
                endpoint: self.credentials.endpoint.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(InvalidConfigValueError {
                    key: "credentials".to_string(),
                    reason: "accessKeyId and secretAccessKey must be set together".to_string(),
                }
                .into());
            }
        };

        let config = PipelineConfig {
            song_data,
            log_data,
            output,
            credentials,
            engine: self.engine,
        };

        config.check_credentials()?;

        Ok(config)
    }
}

fn parse_location(key: &str, value: Option<&str>) -> Result<StorageLocation, ConfigError> {
    let Some(value) = value else {
        return Err(MissingConfigValueError {
            key: key.to_string(),
        }
        .into());
    };

    Ok(StorageLocation::parse(value)?)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Validated configuration of a single pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub song_data: StorageLocation,
    pub log_data: StorageLocation,
    pub output: StorageLocation,
    pub credentials: Option<S3Credentials>,
    pub engine: EngineConfig,
}

impl PipelineConfig {
    pub fn new(song_data: StorageLocation, log_data: StorageLocation, output: StorageLocation) -> Self {
        Self {
            song_data,
            log_data,
            output,
            credentials: None,
            engine: EngineConfig::default(),
        }
    }

    pub fn with_credentials(self, credentials: S3Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..self
        }
    }

    /// All locations the run reads from or writes to
    pub fn locations(&self) -> [&StorageLocation; 3] {
        [&self.song_data, &self.log_data, &self.output]
    }

    /// Credentials are only required when at least one location is remote
    pub fn check_credentials(&self) -> Result<(), MissingCredentialsError> {
        if self.credentials.is_some() {
            return Ok(());
        }

        match self.locations().into_iter().find(|l| l.is_remote()) {
            Some(location) => Err(MissingCredentialsError {
                location: location.to_string(),
            }),
            None => Ok(()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &REDACTED)
            .field("secret_access_key", &REDACTED)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
