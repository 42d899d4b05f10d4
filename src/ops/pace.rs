//! # Resolver pacing hook.
//!
//! The resolver awaits a [`Pace`] before **every** serial retry attempt, including the
//! first one. The hook decides the backoff strategy; the pool does not impose a timeout
//! around it, but pool shutdown interrupts it.
//!
//! Two implementations ship with the crate:
//! - [`BackoffPolicy`]: sleeps `backoff.next(attempt - 1)`
//! - [`PaceFn`]: wraps a zero-argument closure returning a future
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use degrade_pool::{PaceFn, PaceRef};
//!
//! let pace: PaceRef = PaceFn::arc(|| tokio::time::sleep(Duration::from_millis(200)));
//! # let _ = pace;
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::policies::BackoffPolicy;

/// Shared handle to a pacing hook.
pub type PaceRef = Arc<dyn Pace>;

/// Hook awaited by the resolver before each retry attempt.
#[async_trait]
pub trait Pace: Send + Sync + 'static {
    /// Waits before resolver attempt `attempt` (1-based, reset for every failure episode).
    async fn pace(&self, attempt: u32);
}

#[async_trait]
impl Pace for BackoffPolicy {
    async fn pace(&self, attempt: u32) {
        tokio::time::sleep(self.next(attempt.saturating_sub(1))).await;
    }
}

/// Closure-backed pacing hook.
///
/// The closure takes no arguments; it is called once per attempt.
pub struct PaceFn<F> {
    f: F,
}

impl<F> PaceFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the hook and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Pace for PaceFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn pace(&self, _attempt: u32) {
        (self.f)().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn backoff_sleeps_for_attempt_delay() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(1),
            factor: 2.0,
            jitter: Default::default(),
        };

        let start = tokio::time::Instant::now();
        policy.pace(1).await;
        assert_eq!(start.elapsed(), Duration::from_millis(100));

        let start = tokio::time::Instant::now();
        policy.pace(3).await;
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn pace_fn_calls_closure_each_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let pace = PaceFn::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        pace.pace(1).await;
        pace.pace(2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
