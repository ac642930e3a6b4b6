//! Shared types, adapter traits, and the error type of the daily verse
//! dispatcher.
//!
//! Adapter crates and the dispatch engine depend only on this crate, so the
//! engine can be exercised against in-memory fakes.

pub mod content_selector;
pub mod error;
pub mod prelude;
pub mod push_sender;
pub mod subscription_store;
pub mod types;

// vim: ts=4
