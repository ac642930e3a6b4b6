//! Apple Push Notification service (APNs) delivery
//!
//! # Features
//!
//! - Provider authentication tokens (ES256 JWT, `kid` header), cached and
//!   re-signed before the gateway's one hour limit
//! - HTTP/2 delivery to the production or sandbox gateway
//! - Configuration from `APNS_*` environment variables

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod send;
pub mod token;

mod prelude;

pub use config::{ApnsConfig, ApnsEnv};
pub use send::ApnsSender;
pub use token::{DispatchCredential, TokenSigner};

// vim: ts=4
