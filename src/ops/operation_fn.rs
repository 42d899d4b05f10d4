//! # Function-backed operation (`OperationFn`)
//!
//! [`OperationFn`] wraps a closure `F: Fn(T, CancellationToken) -> Fut`, producing a fresh
//! future per invocation from an owned clone of the item.
//!
//! ## Concurrency semantics
//! - Every invocation creates a **new** future that owns its item.
//! - No hidden mutation between invocations; shared state goes in an explicit `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use degrade_pool::{OperationError, OperationFn, OperationRef};
//!
//! let op: OperationRef<u32> = OperationFn::arc("square", |n: u32, _ctx: CancellationToken| async move {
//!     let _ = n * n;
//!     Ok::<_, OperationError>(())
//! });
//!
//! assert_eq!(op.name(), "square");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::OperationError;
use crate::ops::operation::{Item, Operation};

/// Function-backed operation implementation.
#[derive(Debug)]
pub struct OperationFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> OperationFn<F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OperationFn::arc`] when you immediately need an [`OperationRef`](crate::OperationRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, F, Fut> Operation<T> for OperationFn<F>
where
    T: Item,
    F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), OperationError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, item: &T, ctx: CancellationToken) -> Result<(), OperationError> {
        (self.f)(item.clone(), ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_receives_owned_item() {
        let op = OperationFn::new("even", |n: u64, _ctx: CancellationToken| async move {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err(OperationError::fail(format!("{n} is odd")))
            }
        });

        let token = CancellationToken::new();
        assert_eq!(Operation::<u64>::name(&op), "even");
        assert!(op.run(&4u64, token.clone()).await.is_ok());
        assert_eq!(
            op.run(&3u64, token).await,
            Err(OperationError::fail("3 is odd"))
        );
    }
}
