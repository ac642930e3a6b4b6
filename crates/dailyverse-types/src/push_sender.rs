//! Delivery of a single notification to a single device.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait PushSender: Debug + Send + Sync {
	/// Delivers an alert with `title` and `body` to `device_token`.
	///
	/// Fails with `Error::DeliveryFailure` when the gateway rejects the
	/// notification and with `Error::TransportFailure` when it cannot be
	/// reached in time.
	async fn send(&self, device_token: &str, title: &str, body: &str) -> DvResult<()>;
}

// vim: ts=4
