// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![feature(error_generic_member_access)]

use std::backtrace::Backtrace;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Failure the caller cannot act on other than by reporting it: a store that
/// went away after retries, a row that no longer decodes. The original error
/// stays reachable as the source, a backtrace is captured on conversion unless
/// the source already carries one.
#[derive(Error, Debug)]
#[error("Internal error{}", context_suffix(.context.as_deref()))]
pub struct InternalError {
    #[source]
    source: BoxedError,
    context: Option<String>,
    #[backtrace]
    backtrace: Option<Backtrace>,
}

impl InternalError {
    pub fn new<E: Into<BoxedError>>(e: E) -> Self {
        let source = e.into();
        let backtrace = if std::error::request_ref::<Backtrace>(source.as_ref()).is_some() {
            None
        } else {
            Some(Backtrace::capture())
        };

        Self {
            source,
            context: None,
            backtrace,
        }
    }

    /// Names the operation that failed, e.g. "loading real events"
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

fn context_suffix(context: Option<&str>) -> String {
    context
        .map(|context| format!(" while {context}"))
        .unwrap_or_default()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub trait ErrorIntoInternal {
    fn int_err(self) -> InternalError;
}

impl<E> ErrorIntoInternal for E
where
    E: Into<BoxedError>,
{
    fn int_err(self) -> InternalError {
        InternalError::new(self)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub trait ResultIntoInternal<T> {
    fn int_err(self) -> Result<T, InternalError>;

    /// Same as [`ResultIntoInternal::int_err`], naming the failed operation
    fn context_int_err(self, context: impl Into<String>) -> Result<T, InternalError>;
}

impl<T, E> ResultIntoInternal<T> for Result<T, E>
where
    E: Into<BoxedError>,
{
    fn int_err(self) -> Result<T, InternalError> {
        self.map_err(ErrorIntoInternal::int_err)
    }

    fn context_int_err(self, context: impl Into<String>) -> Result<T, InternalError> {
        self.map_err(|e| e.int_err().with_context(context))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
