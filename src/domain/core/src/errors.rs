// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Invalid location '{location}': {reason}")]
pub struct InvalidLocationError {
    pub location: String,
    pub reason: String,
}

impl InvalidLocationError {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
#[error("Location {location} is remote but access key id and secret access key are not configured")]
pub struct MissingCredentialsError {
    pub location: String,
}

#[derive(Error, Debug)]
#[error("Required configuration value '{key}' is not set")]
pub struct MissingConfigValueError {
    pub key: String,
}

#[derive(Error, Debug)]
#[error("Invalid configuration value '{key}': {reason}")]
pub struct InvalidConfigValueError {
    pub key: String,
    pub reason: String,
}

/// Raised when a stage needs an intermediate result that no earlier stage has
/// produced yet
#[derive(Error, Debug)]
#[error("Dependency not ready: table '{name}' is not registered, run the catalog stage first")]
pub struct MissingDependencyError {
    pub name: String,
}

impl MissingDependencyError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Error, Debug)]
#[error("No input files found at {location}")]
pub struct NoInputFilesError {
    pub location: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    MissingValue(#[from] MissingConfigValueError),

    #[error(transparent)]
    InvalidValue(#[from] InvalidConfigValueError),

    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocationError),

    #[error(transparent)]
    MissingCredentials(#[from] MissingCredentialsError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    MissingCredentials(#[from] MissingCredentialsError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    NoInputFiles(#[from] NoInputFilesError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    MissingDependency(#[from] MissingDependencyError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocationError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Umbrella error of a pipeline run, any variant aborts the run
#[derive(Error, Debug)]
pub enum EtlError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<MissingDependencyError> for EtlError {
    fn from(value: MissingDependencyError) -> Self {
        Self::Transform(value.into())
    }
}
