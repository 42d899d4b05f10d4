//! # Pool configuration.
//!
//! Provides [`PoolConfig`] centralized settings for a [`Pool`](crate::Pool).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-invocation timeout
//! - `bus_capacity = 0` → clamped to 1 by the bus

use std::time::Duration;

/// Configuration for a pool.
///
/// ## Field semantics
/// - `parallelism`: number of workers per generation, and the queue bound (`0` is rejected)
/// - `timeout`: per-invocation timeout (`0s` = no timeout)
/// - `grace`: how long [`Pool::join`](crate::Pool::join) waits after shutdown
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of parallel workers in a generation; also the task queue capacity.
    pub parallelism: usize,

    /// Per-invocation timeout.
    ///
    /// An invocation that exceeds it counts as an operation failure.
    /// `Duration::ZERO` disables the timeout.
    pub timeout: Duration,

    /// Maximum time to wait for workers to stop once the lifetime token is cancelled.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl PoolConfig {
    /// Returns the per-invocation timeout as an `Option`.
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `parallelism = 4`
    /// - `timeout = 0s` (no timeout)
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            parallelism: 4,
            timeout: Duration::ZERO,
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
