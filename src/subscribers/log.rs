//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [generation-started] gen=1 op="upload"
//! [worker-failed] gen=1 worker=0 err="connection refused"
//! [requeued] gen=1 worker=0
//! [generation-stopped] gen=1
//! [resolver-engaged] gen=1
//! [resolver-attempt-failed] gen=1 attempt=1 err="connection refused"
//! [resolved] gen=1 attempts=2
//! [shutdown-requested]
//! [pool-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let gen_id = e.generation.unwrap_or_default();
        match e.kind {
            EventKind::GenerationStarted => {
                println!("[generation-started] gen={gen_id} op={:?}", e.operation);
            }
            EventKind::WorkerFailed => {
                println!(
                    "[worker-failed] gen={gen_id} worker={:?} err={:?}",
                    e.worker, e.reason
                );
            }
            EventKind::ItemRequeued => {
                println!("[requeued] gen={gen_id} worker={:?}", e.worker);
            }
            EventKind::TimeoutHit => {
                println!("[timeout] gen={gen_id} timeout_ms={:?}", e.timeout_ms);
            }
            EventKind::GenerationStopped => {
                println!("[generation-stopped] gen={gen_id}");
            }
            EventKind::ResolverEngaged => {
                println!("[resolver-engaged] gen={gen_id}");
            }
            EventKind::ResolverAttemptFailed => {
                println!(
                    "[resolver-attempt-failed] gen={gen_id} attempt={:?} err={:?}",
                    e.attempt, e.reason
                );
            }
            EventKind::Resolved => {
                println!("[resolved] gen={gen_id} attempts={:?}", e.attempt);
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::PoolStopped => {
                println!("[pool-stopped]");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber] name={} info={}",
                    e.operation.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
