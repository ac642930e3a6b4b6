//! Dispatch engine
//!
//! One sweep loads every subscriber, works out each one's local calendar date,
//! and delivers one verse to everyone who has not received one today. Errors
//! are contained per subscriber; only configuration problems end a sweep.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod due;
pub mod outcome;
pub mod runner;

mod prelude;

pub use outcome::{NotificationResult, Outcome, SkipReason, SweepReport};
pub use runner::{DispatchOpts, DispatchRunner};

// vim: ts=4
