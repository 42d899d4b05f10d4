//! Error types used by the pool runtime and by operations.
//!
//! This module defines three error enums:
//!
//! - [`PoolError`]: errors raised by the pool itself (construction, lifecycle, shutdown).
//! - [`OperationError`]: errors raised by a single invocation of the user operation.
//! - [`PushError`]: non-blocking enqueue rejected by a full queue.
//!
//! `PoolError` and `OperationError` provide helper methods (`as_label`, `as_message`) for logging subscribers.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the pool runtime.
///
/// These never describe a failing item: operation failures are absorbed by the
/// resolver and are only visible through [`Event`](crate::Event)s.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The parallelism factor must be at least 1.
    #[error("parallelism factor must be positive")]
    ZeroParallelism,

    /// [`Pool::start`](crate::Pool::start) was called more than once.
    #[error("pool already started")]
    AlreadyStarted,

    /// [`Pool::join`](crate::Pool::join) was called before [`Pool::start`](crate::Pool::start).
    #[error("pool not started")]
    NotStarted,

    /// Shutdown grace period was exceeded; some workers were still running.
    #[error("shutdown timeout {grace:?} exceeded; workers still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },

    /// The controller task panicked.
    #[error("controller panicked")]
    ControllerPanicked,
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use degrade_pool::PoolError;
    /// use std::time::Duration;
    ///
    /// let err = PoolError::GraceExceeded { grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "pool_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::ZeroParallelism => "pool_zero_parallelism",
            PoolError::AlreadyStarted => "pool_already_started",
            PoolError::NotStarted => "pool_not_started",
            PoolError::GraceExceeded { .. } => "pool_grace_exceeded",
            PoolError::ControllerPanicked => "pool_controller_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PoolError::GraceExceeded { grace } => format!("grace exceeded after {grace:?}"),
            other => other.to_string(),
        }
    }
}

/// # Errors produced by one invocation of an [`Operation`](crate::Operation).
///
/// `Fail` and `Timeout` are both treated as an operation failure: the worker
/// requeues its item and the pool degrades to serial retry. `Canceled` means
/// the invocation was cut short by pool shutdown and is never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Invocation failed; the item will be retried by the resolver.
    #[error("operation failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Invocation exceeded the configured per-invocation timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Invocation was aborted because the pool is shutting down.
    #[error("pool shutting down")]
    Canceled,
}

impl OperationError {
    /// Convenience constructor for [`OperationError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        OperationError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use degrade_pool::OperationError;
    ///
    /// assert_eq!(OperationError::fail("boom").as_label(), "operation_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            OperationError::Fail { .. } => "operation_failed",
            OperationError::Timeout { .. } => "operation_timeout",
            OperationError::Canceled => "operation_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            OperationError::Fail { reason } => format!("error: {reason}"),
            OperationError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            OperationError::Canceled => "pool shutting down".to_string(),
        }
    }

    /// Indicates whether this error degrades the pool to serial retry.
    ///
    /// Returns `true` for [`OperationError::Fail`] and [`OperationError::Timeout`].
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            OperationError::Fail { .. } | OperationError::Timeout { .. }
        )
    }
}

/// Error returned by [`Pool::try_push`](crate::Pool::try_push).
///
/// Hands the rejected item back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError<T> {
    /// The task queue is at capacity.
    #[error("task queue full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Returns the rejected item.
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(item) => item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_is_not_a_failure() {
        assert!(OperationError::fail("x").is_failure());
        assert!(
            OperationError::Timeout {
                timeout: Duration::from_millis(5)
            }
            .is_failure()
        );
        assert!(!OperationError::Canceled.is_failure());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(PoolError::ZeroParallelism.as_label(), "pool_zero_parallelism");
        assert_eq!(PoolError::AlreadyStarted.as_label(), "pool_already_started");
        assert_eq!(OperationError::Canceled.as_label(), "operation_canceled");
    }
}
