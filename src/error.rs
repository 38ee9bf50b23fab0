//! Error types used by the dispatcher and its handlers.
//!
//! This module defines:
//!
//! - [`DispatchError`] - errors raised by a dispatcher operation itself.
//! - [`HandlerError`] - errors raised by an individual handler invocation.
//! - [`HandlerFailure`] - one failed invocation inside an aggregate, tagged with the handler name.
//!
//! Error enums provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by a dispatcher.
///
/// `InvalidArgument` is reported synchronously by registration calls.
/// `HandlersFailed` is the aggregate returned by `invoke` after **all** handlers completed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The handler handle was empty (never pointed at a handler, or its target was already reclaimed).
    #[error("invalid handler: {reason}")]
    InvalidArgument {
        /// Why the handler was rejected.
        reason: &'static str,
    },

    /// One or more handler invocations failed; siblings were still awaited to completion.
    #[error("{failed} of {total} handler(s) failed", failed = .failures.len())]
    HandlersFailed {
        /// Number of handlers invoked in this pass.
        total: usize,
        /// Every failed invocation, in completion order.
        failures: Vec<HandlerFailure>,
    },
}

impl DispatchError {
    pub(crate) fn empty_handle() -> Self {
        DispatchError::InvalidArgument {
            reason: "handle is empty or its handler was already reclaimed",
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use weakcast::DispatchError;
    ///
    /// let err = DispatchError::HandlersFailed { total: 3, failures: vec![] };
    /// assert_eq!(err.as_label(), "dispatch_handlers_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::InvalidArgument { .. } => "dispatch_invalid_argument",
            DispatchError::HandlersFailed { .. } => "dispatch_handlers_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            DispatchError::HandlersFailed { total, failures } => {
                let names: Vec<&str> = failures.iter().map(|f| f.handler.as_str()).collect();
                format!("{} of {total} handlers failed: {names:?}", failures.len())
            }
        }
    }

    /// Failed invocations carried by this error (empty for `InvalidArgument`).
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            DispatchError::HandlersFailed { failures, .. } => failures,
            DispatchError::InvalidArgument { .. } => &[],
        }
    }
}

/// # Errors produced by a handler invocation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler reported a failure.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The handler panicked; the panic was caught by the dispatcher.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text (when it was a string).
        info: String,
    },

    /// The handler observed the cancellation token and gave up.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use weakcast::HandlerError;
    ///
    /// let err = HandlerError::fail("disk full");
    /// assert_eq!(err.to_string(), "handler failed: disk full");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        HandlerError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Panicked { info } => format!("panic: {info}"),
            HandlerError::Canceled => "cancelled".to_string(),
        }
    }
}

/// One failed invocation inside [`DispatchError::HandlersFailed`].
#[derive(Error, Debug, Clone)]
#[error("handler '{handler}' failed: {error}")]
pub struct HandlerFailure {
    /// Name reported by the handler (`Handler::name`).
    pub handler: String,
    /// What went wrong.
    #[source]
    pub error: HandlerError,
}
