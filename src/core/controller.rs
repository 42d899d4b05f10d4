//! # Controller: generation lifecycle as an explicit loop.
//!
//! ```text
//! loop {
//!   ├─► Generation::spawn()          (N workers, fresh token)
//!   ├─► Resolver::resolve(&mut gen)
//!   │     ├─ Resolved  → continue (next generation)
//!   │     └─ Shutdown  → break
//! }
//! on exit:
//!   ├─► publish ShutdownRequested
//!   ├─► join the last generation's workers
//!   ├─► join background requeues
//!   └─► publish PoolStopped
//! ```
//!
//! The resolver runs inside the controller task, so restarting parallel mode never
//! spawns anything besides the next generation's workers and, when the queue was full
//! at failure time, one background requeue per failing worker.

use std::sync::Arc;

use crate::{
    core::{
        generation::Generation,
        resolver::{Resolution, Resolver},
        shared::Shared,
    },
    events::{Event, EventKind},
    ops::Item,
};

pub(crate) struct Controller<T: Item> {
    shared: Arc<Shared<T>>,
}

impl<T: Item> Controller<T> {
    pub fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Runs generations until the pool lifetime token is cancelled.
    pub async fn run(self) {
        let resolver = Resolver::new(Arc::clone(&self.shared));

        let mut generation = Generation::spawn(&self.shared);
        while resolver.resolve(&mut generation).await == Resolution::Resolved {
            generation = Generation::spawn(&self.shared);
        }

        self.shared
            .bus
            .publish(Event::new(EventKind::ShutdownRequested));
        generation.stopped().await;
        self.shared.requeues_stopped().await;
        self.shared.bus.publish(Event::new(EventKind::PoolStopped));
    }
}
