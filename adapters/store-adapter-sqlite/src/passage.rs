//! Verse selection

use rand::RngExt;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::inspect;
use dailyverse_types::{content_selector::INTEREST_TAGS, prelude::*, types::Passage};

/// Interest tags in uniformly random order
pub(crate) fn shuffled_tags() -> [&'static str; 7] {
	let mut tags = INTEREST_TAGS;
	let mut rng = rand::rng();
	for i in (1..tags.len()).rev() {
		tags.swap(i, rng.random_range(0..=i));
	}
	tags
}

fn read_passage(row: &SqliteRow) -> Result<Passage, sqlx::Error> {
	Ok(Passage::new(
		row.try_get::<&str, _>("text")?,
		row.try_get::<&str, _>("book")?,
		row.try_get("chapter")?,
		row.try_get("verse_number")?,
	))
}

/// One random verse tagged `tag` whose text fits in `max_len` characters
pub(crate) async fn select_by_tag(
	db: &SqlitePool,
	tag: &str,
	max_len: usize,
) -> DvResult<Option<Passage>> {
	let row = sqlx::query(
		"SELECT v.text, b.name AS book, c.number AS chapter, v.verse_number
		 FROM verses_web v
		 JOIN chapters c ON v.chapter_id = c.id
		 JOIN books b ON c.book_id = b.id
		 JOIN verse_tags vt ON v.id = vt.verse_id
		 JOIN tags t ON vt.tag_id = t.id
		 WHERE t.name = ? AND length(v.text) <= ?
		 ORDER BY random()
		 LIMIT 1",
	)
	.bind(tag)
	.bind(i64::try_from(max_len).unwrap_or(i64::MAX))
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	let Some(row) = row else {
		return Ok(None);
	};

	let passage = read_passage(&row).inspect_err(inspect).or(Err(Error::DbError))?;
	Ok(Some(passage))
}

/// Tries every interest tag in random order until one yields a verse
pub(crate) async fn select_passage(db: &SqlitePool, max_len: usize) -> DvResult<Passage> {
	for tag in shuffled_tags() {
		if let Some(passage) = select_by_tag(db, tag, max_len).await? {
			return Ok(passage);
		}
		debug!(tag, max_len, "no verse for tag");
	}
	Err(Error::NoContentAvailable)
}


// vim: ts=4
