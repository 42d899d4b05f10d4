//! # Generation: one cohort of parallel workers.
//!
//! A [`Generation`] spawns `parallelism` workers into its own [`JoinSet`], all bound
//! to one cancellation token derived from the pool lifetime token. The first worker
//! whose invocation fails cancels that token; every sibling finishes its current
//! invocation and then exits instead of taking another item. A generation is never
//! reused.
//!
//! ```text
//! Generation::spawn()
//!   ├─► id = next_generation()
//!   ├─► token = lifetime.child_token()
//!   ├─► JoinSet ← Worker[0..N].run(token)
//!   └─► publish GenerationStarted
//!
//! failed()  : waits for token cancellation
//! stopped() : joins every worker, publishes GenerationStopped
//! ```

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{shared::Shared, worker::Worker},
    events::{Bus, Event, EventKind},
    ops::Item,
};

pub(crate) struct Generation {
    id: u64,
    token: CancellationToken,
    workers: JoinSet<()>,
    bus: Bus,
    stopped: bool,
}

impl Generation {
    /// Spawns a fresh generation of workers.
    pub fn spawn<T: Item>(shared: &Arc<Shared<T>>) -> Self {
        let id = shared.next_generation();
        let token = shared.token.child_token();

        let mut workers = JoinSet::new();
        for index in 0..shared.cfg.parallelism {
            let worker = Worker::new(index, id, Arc::clone(shared));
            workers.spawn(worker.run(token.clone()));
        }

        shared.bus.publish(
            Event::new(EventKind::GenerationStarted)
                .with_operation(shared.operation.name())
                .with_generation(id),
        );

        Self {
            id,
            token,
            workers,
            bus: shared.bus.clone(),
            stopped: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resolves once a worker has failed (or the pool shut down).
    pub async fn failed(&self) {
        self.token.cancelled().await
    }

    /// Waits until every worker has exited.
    ///
    /// Publishes `GenerationStopped` on the first completed call only.
    pub async fn stopped(&mut self) {
        while self.workers.join_next().await.is_some() {}
        if !self.stopped {
            self.stopped = true;
            self.bus
                .publish(Event::new(EventKind::GenerationStopped).with_generation(self.id));
        }
    }
}
