// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt::Write as _;
use std::process::ExitCode;

use internal_error::{BoxedError, InternalError};
use playlog_etl_datafusion::{
    ConfigError,
    EtlError,
    ReadError,
    SessionError,
    TransformError,
    WriteError,
};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum CLIError {
    /// Invalid arguments or configuration, nothing was processed
    #[error(transparent)]
    UsageError(UsageError),

    /// Failure of the run itself
    #[error(transparent)]
    Failure(BoxedError),

    #[error(transparent)]
    CriticalFailure(#[from] InternalError),
}

impl CLIError {
    pub fn usage_error(msg: impl Into<String>) -> Self {
        Self::UsageError(UsageError {
            msg: Some(msg.into()),
            source: None,
        })
    }

    pub fn usage_error_from(e: impl Into<BoxedError>) -> Self {
        Self::UsageError(UsageError {
            msg: None,
            source: Some(e.into()),
        })
    }

    pub fn failure(e: impl Into<BoxedError>) -> Self {
        Self::Failure(e.into())
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    pub fn exit_status(&self) -> u8 {
        match self {
            Self::UsageError(_) => EXIT_USAGE_ERROR,
            Self::Failure(_) | Self::CriticalFailure(_) => EXIT_FAILURE,
        }
    }

    /// Renders the error with its chain of causes, optionally followed by
    /// the captured backtrace
    pub fn pretty(&self, include_backtrace: bool) -> String {
        let mut buf = format!("{}: {self}", console::style("Error").red().bold());

        if let Self::CriticalFailure(e) = self
            && let Some(context) = e.context()
        {
            let _ = write!(buf, " ({context})");
        }

        let mut source = self.first_cause();
        while let Some(err) = source {
            let _ = write!(buf, "\n  Caused by: {err}");
            source = err.source();
        }

        if include_backtrace
            && let Self::CriticalFailure(e) = self
            && e.backtrace().status() == BacktraceStatus::Captured
        {
            let _ = write!(
                buf,
                "\n\nBacktrace:\n{}",
                console::style(e.backtrace()).dim().bold()
            );
        }

        buf
    }

    // Transparent variants already display the message of the wrapped error,
    // so the chain starts one level below it
    fn first_cause(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::UsageError(e) => match (&e.msg, &e.source) {
                (Some(_), Some(source)) => Some(source.as_ref()),
                (None, Some(source)) => source.source(),
                (_, None) => None,
            },
            Self::Failure(e) => e.source(),
            Self::CriticalFailure(e) => e.source(),
        }
    }
}

impl From<ConfigError> for CLIError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::Internal(e) => Self::CriticalFailure(e),
            e => Self::usage_error_from(e),
        }
    }
}

impl From<EtlError> for CLIError {
    fn from(value: EtlError) -> Self {
        match value {
            EtlError::Internal(e)
            | EtlError::Session(SessionError::Internal(e))
            | EtlError::Read(ReadError::Internal(e))
            | EtlError::Transform(TransformError::Internal(e))
            | EtlError::Write(WriteError::Internal(e)) => Self::CriticalFailure(e),
            e => Self::failure(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct UsageError {
    pub msg: Option<String>,
    pub source: Option<BoxedError>,
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.msg, &self.source) {
            (Some(msg), _) => write!(f, "{msg}"),
            (None, Some(source)) => write!(f, "{source}"),
            (None, None) => write!(f, "Invalid usage"),
        }
    }
}

impl StdError for UsageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
