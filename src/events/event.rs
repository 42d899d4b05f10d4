//! # Runtime events emitted by the pool.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Generation events**: parallel cohort lifecycle (started, worker failed, stopped)
//! - **Resolver events**: serial retry mode (engaged, attempt failed, resolved)
//! - **Terminal events**: pool shutdown
//!
//! The [`Event`] struct carries additional metadata such as timestamps, generation id,
//! worker index, reasons and timeouts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use degrade_pool::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerFailed)
//!     .with_operation("upload")
//!     .with_generation(3)
//!     .with_worker(1)
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::WorkerFailed);
//! assert_eq!(ev.generation, Some(3));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `operation`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `operation`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Generation events ===
    /// A new generation of parallel workers was spawned.
    ///
    /// Sets:
    /// - `generation`: generation id (1-based)
    /// - `operation`: operation name
    GenerationStarted,

    /// A worker's invocation failed; the generation is being cancelled.
    ///
    /// Sets:
    /// - `generation`, `worker`, `operation`
    /// - `reason`: failure message
    WorkerFailed,

    /// A failed item was pushed back onto the task queue.
    ///
    /// Sets:
    /// - `generation`, `worker`
    ItemRequeued,

    /// An invocation exceeded the per-invocation timeout.
    ///
    /// Sets:
    /// - `generation`, `operation`
    /// - `timeout_ms`: configured timeout (ms)
    TimeoutHit,

    /// Every worker of a generation has exited.
    ///
    /// Sets:
    /// - `generation`
    GenerationStopped,

    // === Resolver events ===
    /// Resolver took an item and entered serial retry mode.
    ///
    /// Sets:
    /// - `generation`: id of the failed generation
    ResolverEngaged,

    /// One serial retry attempt failed.
    ///
    /// Sets:
    /// - `generation`, `attempt` (1-based per episode), `reason`
    ResolverAttemptFailed,

    /// Serial retry succeeded; parallel mode resumes.
    ///
    /// Sets:
    /// - `generation`: id of the failed generation
    /// - `attempt`: number of attempts it took
    Resolved,

    // === Shutdown events ===
    /// Lifetime token cancellation observed by the controller.
    ShutdownRequested,

    /// Controller exited; no more invocations will happen.
    PoolStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Generation id, if applicable.
    pub generation: Option<u64>,
    /// Worker index inside its generation, if applicable.
    pub worker: Option<usize>,
    /// Resolver attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Invocation timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Name of the operation (or subscriber for subscriber events).
    pub operation: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            generation: None,
            worker: None,
            attempt: None,
            timeout_ms: None,
            reason: None,
            operation: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an operation name.
    #[inline]
    pub fn with_operation(mut self, name: impl Into<Arc<str>>) -> Self {
        self.operation = Some(name.into());
        self
    }

    #[inline]
    pub fn with_generation(mut self, id: u64) -> Self {
        self.generation = Some(id);
        self
    }

    #[inline]
    pub fn with_worker(mut self, index: usize) -> Self {
        self.worker = Some(index);
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_operation(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_operation(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::GenerationStarted);
        let b = Event::new(EventKind::GenerationStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_is_saturated_to_u32_millis() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX / 4));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }
}
