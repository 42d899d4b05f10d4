//! # Operation and pacing abstractions.
//!
//! This module provides the two collaborators a [`Pool`](crate::Pool) is built from:
//! - [`Operation`] - trait for the async, fallible per-item operation
//! - [`OperationFn`] - closure-backed operation
//! - [`Pace`] - trait for the hook the resolver awaits before every serial retry
//! - [`PaceFn`] - closure-backed pacing hook ([`BackoffPolicy`](crate::BackoffPolicy) also implements [`Pace`])
//! - [`Item`] - bound every queued item satisfies

mod operation;
mod operation_fn;
mod pace;

pub use operation::{Item, Operation, OperationRef};
pub use operation_fn::OperationFn;
pub use pace::{Pace, PaceFn, PaceRef};
