//! # Operation abstraction.
//!
//! Defines the [`Operation`] trait (async, fallible, cancelable) invoked by parallel
//! workers and by the resolver. The common handle type is [`OperationRef`].
//!
//! An operation receives a [`CancellationToken`] derived from the pool lifetime token
//! and may check it to stop early during shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::OperationError;

/// Bound satisfied by every item pushed into a pool.
///
/// Items are cloned only by closure-backed operations ([`OperationFn`](crate::OperationFn));
/// the pool itself moves them.
pub trait Item: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Item for T {}

/// Shared handle to an operation.
pub type OperationRef<T> = Arc<dyn Operation<T>>;

/// # Async, fallible per-item operation.
///
/// The same instance is invoked concurrently by every worker of a generation,
/// so implementations must be safe to call from several tasks at once.
///
/// Returning [`OperationError::Fail`] (or exceeding the pool timeout) degrades the pool
/// to serial retry. Returning [`OperationError::Canceled`] is treated as a shutdown exit.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use degrade_pool::{Operation, OperationError};
///
/// struct Upload;
///
/// #[async_trait]
/// impl Operation<String> for Upload {
///     fn name(&self) -> &str { "upload" }
///
///     async fn run(&self, path: &String, ctx: CancellationToken) -> Result<(), OperationError> {
///         if ctx.is_cancelled() {
///             return Err(OperationError::Canceled);
///         }
///         if path.is_empty() {
///             return Err(OperationError::fail("empty path"));
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Operation<T: Item>: Send + Sync + 'static {
    /// Returns a stable, human-readable name used in events.
    fn name(&self) -> &str {
        "operation"
    }

    /// Processes one item.
    async fn run(&self, item: &T, ctx: CancellationToken) -> Result<(), OperationError>;
}
