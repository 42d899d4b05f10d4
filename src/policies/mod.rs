//! Pacing policies.
//!
//! This module groups the knobs that control **how long** the resolver waits
//! between serial retry attempts while the operation keeps failing.
//!
//! ## Contents
//! - [`BackoffPolicy`] how delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=1s, factor=1.0 (constant), max=30s, jitter=None.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
