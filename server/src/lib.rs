//! Process entry points of the daily verse dispatcher
//!
//! `dailyverse-sweep` runs one dispatch sweep and exits; it is meant to be
//! started periodically by an external scheduler. `dailyverse-api` serves
//! device registration and verse lookup.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;

pub use config::ServerConfig;

// vim: ts=4
