//! # Worker: one member of a parallel generation.
//!
//! ## Loop
//! ```text
//! loop {
//!   select (biased) {
//!     pool shutdown        → exit
//!     generation cancelled → exit
//!     item received        → invoke
//!   }
//!   Ok        → continue
//!   Canceled  → exit (pool shutdown, no requeue)
//!   Fail      → publish WorkerFailed
//!               requeue item (in the background if the queue is full),
//!               cancel generation, exit
//! }
//! ```
//!
//! ## Rules
//! - A worker never retries; serial retry belongs to the resolver.
//! - At most one item re-enters the queue per failing worker.
//! - If producers filled the queue, the requeue is handed to a background task and the
//!   worker exits at once. Joining a generation therefore only waits for invocations,
//!   never for queue space.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    core::shared::Shared,
    error::{OperationError, PushError},
    events::{Event, EventKind},
    ops::Item,
};

pub(crate) struct Worker<T: Item> {
    index: usize,
    generation: u64,
    shared: Arc<Shared<T>>,
}

impl<T: Item> Worker<T> {
    pub fn new(index: usize, generation: u64, shared: Arc<Shared<T>>) -> Self {
        Self {
            index,
            generation,
            shared,
        }
    }

    /// Runs until the generation is cancelled or the pool shuts down.
    pub async fn run(self, gen_token: CancellationToken) {
        loop {
            let item = tokio::select! {
                biased;
                _ = self.shared.token.cancelled() => return,
                _ = gen_token.cancelled() => return,
                item = self.shared.queue.recv() => match item {
                    Some(item) => item,
                    None => return,
                },
            };

            match self.shared.invoke(&item, self.generation).await {
                Ok(()) => {}
                Err(OperationError::Canceled) => return,
                Err(e) => {
                    self.shared.bus.publish(
                        Event::new(EventKind::WorkerFailed)
                            .with_operation(self.shared.operation.name())
                            .with_generation(self.generation)
                            .with_worker(self.index)
                            .with_reason(e.to_string()),
                    );
                    self.requeue(item, &gen_token);
                    return;
                }
            }
        }
    }

    fn requeue(&self, item: T, gen_token: &CancellationToken) {
        match self.shared.queue.try_push(item) {
            Ok(()) => {
                gen_token.cancel();
                self.shared.requeued(self.generation, self.index);
            }
            Err(PushError::Full(item)) => {
                gen_token.cancel();
                self.shared.spawn_requeue(item, self.generation, self.index);
            }
        }
    }
}
