//! State shared by the controller, every worker and the resolver.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{config::PoolConfig, queue::TaskQueue, runner::Site},
    error::OperationError,
    events::{Bus, Event, EventKind},
    ops::{Item, OperationRef, PaceRef},
};

/// Pool-wide state. Lives behind an `Arc` for the whole pool lifetime.
pub(crate) struct Shared<T: Item> {
    /// Queue shared across all generations.
    pub queue: TaskQueue<T>,
    pub operation: OperationRef<T>,
    pub pacer: PaceRef,
    pub cfg: PoolConfig,
    pub bus: Bus,
    /// Overarching lifetime token (owned by the caller).
    pub token: CancellationToken,
    /// Id of the most recently spawned generation (0 = none yet).
    pub generation: AtomicU64,
    /// Requeues that found the queue full and outlive the worker that failed.
    pub requeues: Mutex<JoinSet<()>>,
}

impl<T: Item> Shared<T> {
    /// Allocates the next generation id (1-based).
    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Pushes a failed item back in the background, waiting for queue space.
    ///
    /// The task is not part of any generation, so joining a generation never
    /// waits on queue capacity.
    pub fn spawn_requeue(self: &Arc<Self>, item: T, generation: u64, worker: usize) {
        let shared = Arc::clone(self);
        let mut set = self.requeues.lock().unwrap_or_else(PoisonError::into_inner);
        while set.try_join_next().is_some() {}
        set.spawn(async move {
            tokio::select! {
                biased;
                _ = shared.token.cancelled() => return,
                _ = shared.queue.push(item) => {}
            }
            shared.requeued(generation, worker);
        });
    }

    pub fn requeued(&self, generation: u64, worker: usize) {
        self.bus.publish(
            Event::new(EventKind::ItemRequeued)
                .with_generation(generation)
                .with_worker(worker),
        );
    }

    /// Waits for every background requeue to finish (they exit on shutdown).
    pub async fn requeues_stopped(&self) {
        let mut set = std::mem::take(
            &mut *self.requeues.lock().unwrap_or_else(PoisonError::into_inner),
        );
        while set.join_next().await.is_some() {}
    }

    /// Runs the operation once on `item`, tagged with `generation`.
    pub async fn invoke(&self, item: &T, generation: u64) -> Result<(), OperationError> {
        crate::core::runner::invoke(
            self.operation.as_ref(),
            item,
            &self.token,
            self.cfg.default_timeout(),
            Site { generation },
            &self.bus,
        )
        .await
    }
}
