//! # Resolver: serial retry after a generation fails.
//!
//! The resolver runs inline in the controller task, one episode per failed
//! generation.
//!
//! ## Episode
//! ```text
//! 1. select (biased) { shutdown → Shutdown, generation failed → go on }
//! 2. join every worker of the failed generation      (races shutdown)
//! 3. take the next available item from the queue     (races shutdown)
//!    → publish ResolverEngaged
//! 4. loop {
//!      attempt += 1
//!      pacer.pace(attempt)                            (races shutdown)
//!      shutdown? → Shutdown
//!      invoke(item)
//!        Ok       → publish Resolved → Resolved
//!        Canceled → Shutdown
//!        Fail     → publish ResolverAttemptFailed, repeat
//!    }
//! ```
//!
//! ## Rules
//! - The item retried is whatever the queue yields next, not necessarily the one that failed.
//! - No invocation happens until every worker has exited, so serial and parallel mode
//!   never overlap. Workers never wait on queue space while exiting (a requeue into a
//!   full queue runs in the background), so this join always completes.
//! - Attempts are numbered from 1 in every episode.

use std::sync::Arc;

use crate::{
    core::{generation::Generation, shared::Shared},
    error::OperationError,
    events::{Event, EventKind},
    ops::Item,
};

/// Outcome of one resolver episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// An item succeeded; the controller starts the next generation.
    Resolved,
    /// The pool lifetime token fired.
    Shutdown,
}

pub(crate) struct Resolver<T: Item> {
    shared: Arc<Shared<T>>,
}

impl<T: Item> Resolver<T> {
    pub fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Watches `generation` and, once it fails, retries one item until it succeeds.
    pub async fn resolve(&self, generation: &mut Generation) -> Resolution {
        let token = &self.shared.token;
        let gen_id = generation.id();

        tokio::select! {
            biased;
            _ = token.cancelled() => return Resolution::Shutdown,
            _ = generation.failed() => {}
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => return Resolution::Shutdown,
            _ = generation.stopped() => {}
        }

        let item = tokio::select! {
            biased;
            _ = token.cancelled() => return Resolution::Shutdown,
            item = self.shared.queue.recv() => match item {
                Some(item) => item,
                None => return Resolution::Shutdown,
            },
        };
        self.shared
            .bus
            .publish(Event::new(EventKind::ResolverEngaged).with_generation(gen_id));

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            tokio::select! {
                biased;
                _ = token.cancelled() => return Resolution::Shutdown,
                _ = self.shared.pacer.pace(attempt) => {}
            }
            if token.is_cancelled() {
                return Resolution::Shutdown;
            }

            match self.shared.invoke(&item, gen_id).await {
                Ok(()) => {
                    self.shared.bus.publish(
                        Event::new(EventKind::Resolved)
                            .with_generation(gen_id)
                            .with_attempt(attempt),
                    );
                    return Resolution::Resolved;
                }
                Err(OperationError::Canceled) => return Resolution::Shutdown,
                Err(e) => {
                    self.shared.bus.publish(
                        Event::new(EventKind::ResolverAttemptFailed)
                            .with_operation(self.shared.operation.name())
                            .with_generation(gen_id)
                            .with_attempt(attempt)
                            .with_reason(e.to_string()),
                    );
                }
            }
        }
    }
}
