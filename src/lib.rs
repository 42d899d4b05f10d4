//! # degrade-pool
//!
//! **degrade-pool** runs a fallible async operation over a stream of items with a pool
//! of parallel workers, and automatically degrades to a single serial retrier whenever
//! the operation starts failing. Once the retried item succeeds, full parallelism comes
//! back.
//!
//! It targets "sticky" downstream failures (a database goes away, a remote API starts
//! refusing connections): instead of N workers hammering the broken dependency, one
//! resolver probes it at a caller-chosen pace while producers are held back by the
//! bounded queue.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producers ─► Pool::push ─► ┌──────────────────────────┐
//!                              │ TaskQueue (bounded = N)  │◄──── requeue on failure
//!                              └────────────┬─────────────┘
//!                                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller (background task, one per pool)                       │
//! │                                                                   │
//! │   Generation g: Worker 0 … Worker N-1   (JoinSet + child token)   │
//! │        │ first failure: requeue item, cancel generation           │
//! │        ▼                                                          │
//! │   Resolver: join workers, take next item,                         │
//! │             loop { pace(attempt); invoke } until Ok               │
//! │        │                                                          │
//! │        ▼                                                          │
//! │   Generation g+1 …                                                │
//! └───────────────────────────────────────────────────────────────────┘
//!                 │ publishes Events
//!                 ▼
//!            Bus (broadcast) ─► SubscriberSet ─► user subscribers
//! ```
//!
//! ### Lifecycle
//! ```text
//! Pool::new(token, N, operation, pacer) ──► start()
//!
//! loop {
//!   ├─► spawn generation (N workers)
//!   │     each worker: select { shutdown | gen cancelled | recv item } → invoke
//!   │       ├─ Ok   ─► next item
//!   │       └─ Err  ─► requeue, cancel generation, exit
//!   ├─► resolver: wait for generation failure
//!   │     ├─► join all workers, recv one item
//!   │     └─► loop { pacer.pace(attempt); invoke } until Ok
//!   └─► continue
//! }
//! exit: lifetime token cancelled ─► every task exits, queued items abandoned
//! ```
//!
//! ## Features
//! | Area              | Description                                                       | Key types / traits                      |
//! |-------------------|-------------------------------------------------------------------|-----------------------------------------|
//! | **Pool**          | Parallel processing with automatic degrade/re-expand.             | [`Pool`], [`PoolBuilder`]               |
//! | **Operations**    | The per-item work, as a trait or a closure.                       | [`Operation`], [`OperationFn`]          |
//! | **Pacing**        | What the resolver waits on between serial retries.                | [`Pace`], [`PaceFn`], [`BackoffPolicy`] |
//! | **Subscriber API**| Hook into pool lifecycle events.                                  | [`Subscribe`], [`Event`]                |
//! | **Errors**        | Typed errors for the pool and for operations.                     | [`PoolError`], [`OperationError`]       |
//! | **Configuration** | Parallelism, per-invocation timeout, shutdown grace.              | [`PoolConfig`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use degrade_pool::{OperationError, OperationFn, PaceFn, Pool, PoolConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = CancellationToken::new();
//!
//!     let op = OperationFn::arc("store", |key: String, _ctx: CancellationToken| async move {
//!         if key.is_empty() {
//!             return Err(OperationError::fail("empty key"));
//!         }
//!         Ok(())
//!     });
//!     let pace = PaceFn::arc(|| tokio::time::sleep(Duration::from_millis(50)));
//!
//!     let cfg = PoolConfig { parallelism: 4, ..PoolConfig::default() };
//!     let pool = Pool::<String>::builder(token.clone(), op, pace)
//!         .with_config(cfg)
//!         .build()?;
//!     pool.start()?;
//!
//!     for key in ["a", "b", "c"] {
//!         pool.push(key.to_string()).await;
//!     }
//!
//!     token.cancel();
//!     pool.join().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod ops;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Pool, PoolBuilder, PoolConfig};
pub use error::{OperationError, PoolError, PushError};
pub use events::{Event, EventKind};
pub use ops::{Item, Operation, OperationFn, OperationRef, Pace, PaceFn, PaceRef};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
