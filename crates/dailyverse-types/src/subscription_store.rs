//! Adapter that persists subscriber rows.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{Registration, Subscriber};

#[async_trait]
pub trait SubscriptionStore: Debug + Send + Sync {
	/// Snapshot of every subscriber, newest registration first
	async fn list_all(&self) -> DvResult<Vec<Subscriber>>;

	/// Records a successful delivery for `local_date`.
	///
	/// A row that vanished in the meantime is not an error.
	async fn mark_sent(&self, device_token: &str, local_date: NaiveDate) -> DvResult<()>;

	/// Creates or overwrites the row for `registration.device_token`.
	/// Re-registration clears the last sent date.
	async fn upsert(&self, registration: &Registration) -> DvResult<()>;

	/// Removes every subscriber, returning the number of rows deleted
	async fn delete_all(&self) -> DvResult<u64>;
}

// vim: ts=4
