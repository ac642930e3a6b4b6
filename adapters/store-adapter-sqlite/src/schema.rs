//! Database schema initialization
//!
//! Subscriber rows are owned by this adapter. The content tables are filled
//! by an external import; they are only created here so that a fresh
//! database can be opened and queried.

use sqlx::SqlitePool;

pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Subscribers
	//*************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS daily_verse_subscriptions (
		device_token text NOT NULL,
		timezone text NOT NULL,
		send_hour integer NOT NULL DEFAULT 8,
		last_sent_date text,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		updated_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(device_token)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Content
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS books (
		id integer NOT NULL,
		name text NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS chapters (
		id integer NOT NULL,
		book_id integer NOT NULL,
		number integer NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS verses_web (
		id integer NOT NULL,
		chapter_id integer NOT NULL,
		verse_number integer NOT NULL,
		text text NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS tags (
		id integer NOT NULL,
		name text NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_tags_name ON tags(name)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS verse_tags (
		verse_id integer NOT NULL,
		tag_id integer NOT NULL,
		PRIMARY KEY(verse_id, tag_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_verse_tags_tag ON verse_tags(tag_id)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
