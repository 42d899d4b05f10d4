//! # Pool: the public handle.
//!
//! [`Pool`] owns the task queue, the pool lifetime token, the operation, the pacing hook,
//! and the event bus. [`Pool::start`] spawns the controller in the background;
//! [`Pool::push`] feeds the queue from any task at any time.
//!
//! ## Lifecycle
//! ```text
//! Pool::new / Pool::builder().build()
//!   └─► start()        spawn subscriber listener (if any) + controller
//!         ├─► push(item) … (any time, waits under backpressure)
//!         └─► lifetime token cancelled by the owner
//!               └─► join()  waits ≤ cfg.grace for every task to exit
//!                           (controller, workers, subscriber listener)
//! ```
//!
//! ## Rules
//! - There is no stop method: cancelling the lifetime token is the only way to stop a pool.
//! - Items still queued at shutdown are abandoned.
//! - `start()` is single-call: the second call returns [`PoolError::AlreadyStarted`].
//! - Dropping a started pool without cancelling its token leaves the controller running.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use degrade_pool::{BackoffPolicy, OperationError, OperationFn, Pool};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = CancellationToken::new();
//!     let op = OperationFn::arc("print", |n: u32, _ctx: CancellationToken| async move {
//!         println!("processing {n}");
//!         Ok::<_, OperationError>(())
//!     });
//!
//!     let pool = Pool::<u32>::new(
//!         token.clone(),
//!         2,
//!         op,
//!         std::sync::Arc::new(BackoffPolicy::fixed(Duration::from_millis(100))),
//!     )?;
//!     pool.start()?;
//!
//!     for n in 0..4 {
//!         pool.push(n).await;
//!     }
//!
//!     token.cancel();
//!     pool.join().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError, atomic::AtomicU64};

use tokio::{
    sync::broadcast,
    task::{JoinHandle, JoinSet},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{config::PoolConfig, controller::Controller, queue::TaskQueue, shared::Shared},
    error::{PoolError, PushError},
    events::{Bus, Event, EventKind},
    ops::{Item, OperationRef, PaceRef},
    subscribers::{Subscribe, SubscriberSet},
};

enum State {
    Idle {
        subscribers: Vec<Arc<dyn Subscribe>>,
    },
    Running {
        controller: JoinHandle<()>,
        listener: Option<JoinHandle<()>>,
    },
    Joined,
}

/// Parallel worker pool that degrades to serial retry while its operation fails.
pub struct Pool<T: Item> {
    shared: Arc<Shared<T>>,
    state: Mutex<State>,
}

impl<T: Item> Pool<T> {
    /// Creates a pool with `parallelism` workers and default settings otherwise.
    ///
    /// Returns [`PoolError::ZeroParallelism`] if `parallelism == 0`.
    pub fn new(
        token: CancellationToken,
        parallelism: usize,
        operation: OperationRef<T>,
        pacer: PaceRef,
    ) -> Result<Self, PoolError> {
        Self::builder(token, operation, pacer)
            .with_parallelism(parallelism)
            .build()
    }

    /// Returns a builder for a pool with custom configuration or subscribers.
    pub fn builder(
        token: CancellationToken,
        operation: OperationRef<T>,
        pacer: PaceRef,
    ) -> PoolBuilder<T> {
        PoolBuilder::new(token, operation, pacer)
    }

    /// Begins processing in the background and returns immediately.
    ///
    /// Must be called from within a tokio runtime. Single-call only.
    pub fn start(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let subscribers = match &mut *state {
            State::Idle { subscribers } => std::mem::take(subscribers),
            _ => return Err(PoolError::AlreadyStarted),
        };

        let set = SubscriberSet::new(subscribers, self.shared.bus.clone());
        let listener = (!set.is_empty()).then(|| spawn_listener(&self.shared.bus, set));
        let controller = tokio::spawn(Controller::new(Arc::clone(&self.shared)).run());

        *state = State::Running {
            controller,
            listener,
        };
        Ok(())
    }

    /// Enqueues an item, waiting while the queue is full.
    ///
    /// Once the lifetime token is cancelled this is a no-op and the item is dropped.
    pub async fn push(&self, item: T) {
        tokio::select! {
            biased;
            _ = self.shared.token.cancelled() => {}
            _ = self.shared.queue.push(item) => {}
        }
    }

    /// Enqueues an item without waiting; hands it back if the queue is full.
    pub fn try_push(&self, item: T) -> Result<(), PushError<T>> {
        self.shared.queue.try_push(item)
    }

    /// Waits for the lifetime token to be cancelled, then for the pool to wind down.
    ///
    /// Returns [`PoolError::GraceExceeded`] (and aborts the remaining tasks) if the
    /// controller, its workers and the subscriber listener do not all exit within
    /// [`PoolConfig::grace`].
    pub async fn join(&self) -> Result<(), PoolError> {
        let (controller, listener) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match std::mem::replace(&mut *state, State::Joined) {
                State::Running {
                    controller,
                    listener,
                } => (controller, listener),
                idle @ State::Idle { .. } => {
                    *state = idle;
                    return Err(PoolError::NotStarted);
                }
                State::Joined => return Ok(()),
            }
        };

        self.shared.token.cancelled().await;

        let grace = self.shared.cfg.grace;
        let deadline = time::Instant::now() + grace;
        let abort = controller.abort_handle();
        let mut res = match time::timeout_at(deadline, controller).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_join_err)) => Err(PoolError::ControllerPanicked),
            Err(_elapsed) => {
                abort.abort();
                Err(PoolError::GraceExceeded { grace })
            }
        };

        // Subscribers share the same grace budget as the controller.
        if let Some(listener) = listener {
            let abort = listener.abort_handle();
            if res.is_err() {
                abort.abort();
            } else if time::timeout_at(deadline, listener).await.is_err() {
                abort.abort();
                res = Err(PoolError::GraceExceeded { grace });
            }
        }
        res
    }

    /// Subscribes to pool events.
    ///
    /// The receiver only observes events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Id of the current generation (0 before [`Pool::start`]).
    pub fn generation(&self) -> u64 {
        self.shared.current_generation()
    }

    /// Number of workers per generation; also the queue capacity.
    pub fn parallelism(&self) -> usize {
        self.shared.cfg.parallelism
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.queue.is_empty()
    }

    /// The pool lifetime token.
    pub fn token(&self) -> &CancellationToken {
        &self.shared.token
    }
}

/// Forwards bus events to subscribers until the pool stops.
fn spawn_listener(bus: &Bus, set: SubscriberSet) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let last = matches!(ev.kind, EventKind::PoolStopped);
                    set.emit(ev);
                    if last {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    })
}

/// Builder for [`Pool`].
pub struct PoolBuilder<T: Item> {
    token: CancellationToken,
    operation: OperationRef<T>,
    pacer: PaceRef,
    cfg: PoolConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<T: Item> PoolBuilder<T> {
    pub fn new(token: CancellationToken, operation: OperationRef<T>, pacer: PaceRef) -> Self {
        Self {
            token,
            operation,
            pacer,
            cfg: PoolConfig::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: PoolConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the parallelism factor (workers per generation and queue capacity).
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.cfg.parallelism = parallelism;
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive pool events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the pool. Does not spawn anything; see [`Pool::start`].
    pub fn build(self) -> Result<Pool<T>, PoolError> {
        if self.cfg.parallelism == 0 {
            return Err(PoolError::ZeroParallelism);
        }

        let shared = Shared {
            queue: TaskQueue::new(self.cfg.parallelism),
            operation: self.operation,
            pacer: self.pacer,
            bus: Bus::new(self.cfg.bus_capacity_clamped()),
            cfg: self.cfg,
            token: self.token,
            generation: AtomicU64::new(0),
            requeues: Mutex::new(JoinSet::new()),
        };

        Ok(Pool {
            shared: Arc::new(shared),
            state: Mutex::new(State::Idle {
                subscribers: self.subscribers,
            }),
        })
    }
}
