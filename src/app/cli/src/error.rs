// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Write as _;

use internal_error::{BoxedError, InternalError};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum CLIError {
    #[error(transparent)]
    UsageError(UsageError),

    #[error(transparent)]
    Aborted(CommandInterruptedError),

    #[error(transparent)]
    Failure(BoxedError),
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

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UsageError(_) => 2,
            Self::Aborted(_) => 130,
            Self::Failure(_) => 1,
        }
    }

    /// Error message with its chain of causes. The verbose form prints one
    /// cause per line.
    pub fn pretty(&self, verbose: bool) -> String {
        let mut buf = String::new();
        let _ = write!(buf, "{}", console::style("Error:").red().bold());
        let _ = write!(buf, " {self}");

        let mut source = std::error::Error::source(self);
        while let Some(s) = source {
            if verbose {
                let _ = write!(buf, "\n  {} {s}", console::style("Caused by:").dim());
            } else {
                let _ = write!(buf, ": {s}");
            }
            source = s.source();
        }
        buf
    }
}

impl From<InternalError> for CLIError {
    fn from(e: InternalError) -> Self {
        Self::Failure(e.into())
    }
}

impl From<std::io::Error> for CLIError {
    fn from(e: std::io::Error) -> Self {
        Self::Failure(e.into())
    }
}

impl From<dill::InjectionError> for CLIError {
    fn from(e: dill::InjectionError) -> Self {
        Self::Failure(e.into())
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

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match (&self.msg, &self.source) {
            (Some(_), Some(source)) => Some(source.as_ref()),
            // Already printed as the message itself
            (None, Some(source)) => source.source(),
            (_, None) => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("Command interrupted")]
pub struct CommandInterruptedError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
