//! Runtime core: queue, generations, resolver and their controller.
//!
//! The only public API from this module is [`Pool`] (with [`PoolBuilder`]) and
//! [`PoolConfig`].
//!
//! Internal modules:
//! - [`queue`]: bounded MPMC task queue shared by every generation;
//! - [`runner`]: invokes the operation once with timeout, shutdown race and panic capture;
//! - [`worker`]: one member of a parallel generation;
//! - [`generation`]: spawns and joins a cohort of workers under one token;
//! - [`resolver`]: serial retry of one item after a generation fails;
//! - [`controller`]: loops generation → resolution → generation until shutdown;
//! - [`pool`]: public handle and builder.
//!
//! ## Wiring
//! ```text
//!  producers ── push ──► TaskQueue (cap = N) ◄─────────────────────────┐
//!                           │                                          │ requeue on failure
//!            ┌──────────────┼──────────────┐                           │
//!            ▼              ▼              ▼                           │
//!        Worker 0  …    Worker k  …    Worker N-1 ── Fail ─► cancel gen token
//!            └──── Generation g (JoinSet, child token) ────┘
//!                                   │ gen token cancelled
//!                                   ▼
//!                 Resolver: join workers → recv 1 item → pace → invoke … Ok
//!                                   │
//!                                   ▼
//!                 Controller: spawn Generation g+1
//! ```

mod config;
mod controller;
mod generation;
mod pool;
mod queue;
mod resolver;
mod runner;
mod shared;
mod worker;

pub use config::PoolConfig;
pub use pool::{Pool, PoolBuilder};
