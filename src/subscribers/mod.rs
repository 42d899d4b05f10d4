//! # Event subscribers for the pool runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and (behind the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Worker/Resolver ── publish(Event) ──► Bus ──► pool listener ──► SubscriberSet
//!                                                                    │
//!                                                         ┌──────────┼──────────┐
//!                                                         ▼          ▼          ▼
//!                                                     LogWriter   Custom       ...
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
