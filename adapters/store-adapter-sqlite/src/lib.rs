//! SQLite adapter for subscribers and verse content
//!
//! Both live in the same database file: `daily_verse_subscriptions` for the
//! registered devices, and `books` / `chapters` / `verses_web` / `tags` /
//! `verse_tags` for the tagged verse collection.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod passage;
mod schema;
mod subscription;
mod utils;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;
use std::time::Duration;

use dailyverse_types::{
	content_selector::ContentSelector,
	prelude::*,
	subscription_store::SubscriptionStore,
	types::{Passage, Registration, Subscriber},
};

/// How long a statement waits on a locked database
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
/// How long a caller waits for a free pooled connection
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Opens (or creates) the database file and bootstraps the schema
	pub async fn new(path: impl AsRef<Path>) -> DvResult<Self> {
		let path = path.as_ref();
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal)
			.busy_timeout(BUSY_TIMEOUT);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.acquire_timeout(ACQUIRE_TIMEOUT)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("database opened: {}", path.display());
		Ok(Self { db })
	}
}

#[async_trait]
impl SubscriptionStore for StoreAdapterSqlite {
	async fn list_all(&self) -> DvResult<Vec<Subscriber>> {
		subscription::list_all(&self.db).await
	}

	async fn mark_sent(&self, device_token: &str, local_date: NaiveDate) -> DvResult<()> {
		subscription::mark_sent(&self.db, device_token, local_date).await
	}

	async fn upsert(&self, registration: &Registration) -> DvResult<()> {
		subscription::upsert(&self.db, registration).await
	}

	async fn delete_all(&self) -> DvResult<u64> {
		subscription::delete_all(&self.db).await
	}
}

#[async_trait]
impl ContentSelector for StoreAdapterSqlite {
	async fn select_passage(&self, max_len: usize) -> DvResult<Passage> {
		passage::select_passage(&self.db, max_len).await
	}
}

// vim: ts=4
