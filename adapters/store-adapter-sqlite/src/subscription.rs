//! Subscriber database operations

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::{decode_err, inspect, parse_timestamp};
use dailyverse_types::{
	prelude::*,
	types::{Registration, Subscriber, short_token},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn read_subscriber(row: &SqliteRow) -> Result<Subscriber, sqlx::Error> {
	let last_sent_date = row
		.try_get::<Option<&str>, _>("last_sent_date")?
		.map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT))
		.transpose()
		.map_err(decode_err)?;

	Ok(Subscriber {
		device_token: row.try_get::<&str, _>("device_token")?.into(),
		timezone: row.try_get::<&str, _>("timezone")?.into(),
		send_hour: u8::try_from(row.try_get::<i64, _>("send_hour")?).map_err(decode_err)?,
		last_sent_date,
		created_at: parse_timestamp(row.try_get("created_at")?).map_err(decode_err)?,
		updated_at: parse_timestamp(row.try_get("updated_at")?).map_err(decode_err)?,
	})
}

/// All readable subscribers, most recently created first.
///
/// Timestamps may be unix seconds or date-time text. A row that cannot be
/// decoded is logged and left out, it does not hide the other rows.
pub(crate) async fn list_all(db: &SqlitePool) -> DvResult<Vec<Subscriber>> {
	let rows = sqlx::query(
		"SELECT device_token, timezone, send_hour, last_sent_date,
			CAST(created_at AS TEXT) AS created_at, CAST(updated_at AS TEXT) AS updated_at
		 FROM daily_verse_subscriptions
		 ORDER BY CASE typeof(created_at)
			WHEN 'integer' THEN created_at
			ELSE unixepoch(created_at)
		 END DESC, rowid DESC",
	)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	let mut subscribers = Vec::with_capacity(rows.len());
	for row in &rows {
		match read_subscriber(row) {
			Ok(subscriber) => subscribers.push(subscriber),
			Err(err) => {
				let device = row.try_get::<&str, _>("device_token").map_or("?", short_token);
				warn!(device, "skipping unreadable subscriber row: {}", err);
			}
		}
	}
	Ok(subscribers)
}

pub(crate) async fn mark_sent(
	db: &SqlitePool,
	device_token: &str,
	local_date: NaiveDate,
) -> DvResult<()> {
	let res = sqlx::query(
		"UPDATE daily_verse_subscriptions
		 SET last_sent_date = ?, updated_at = unixepoch()
		 WHERE device_token = ?",
	)
	.bind(local_date.format(DATE_FORMAT).to_string())
	.bind(device_token)
	.execute(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	if res.rows_affected() == 0 {
		// unsubscribed during the sweep
		debug!(device = %short_token(device_token), "mark_sent: no such subscriber");
	}
	Ok(())
}

pub(crate) async fn upsert(db: &SqlitePool, registration: &Registration) -> DvResult<()> {
	sqlx::query(
		"INSERT INTO daily_verse_subscriptions
		 (device_token, timezone, send_hour, last_sent_date, created_at, updated_at)
		 VALUES (?, ?, ?, NULL, unixepoch(), unixepoch())
		 ON CONFLICT(device_token) DO UPDATE SET
			timezone = excluded.timezone,
			send_hour = excluded.send_hour,
			last_sent_date = NULL,
			updated_at = excluded.updated_at",
	)
	.bind(registration.device_token.as_ref())
	.bind(registration.timezone.as_ref())
	.bind(i64::from(registration.send_hour))
	.execute(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	Ok(())
}

pub(crate) async fn delete_all(db: &SqlitePool) -> DvResult<u64> {
	let res = sqlx::query("DELETE FROM daily_verse_subscriptions")
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	Ok(res.rows_affected())
}

// vim: ts=4
