//! Error mapping helpers shared by the query modules

use chrono::{DateTime, NaiveDateTime, Utc};

use dailyverse_types::prelude::*;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Wraps a column conversion failure as a sqlx decode error
pub(crate) fn decode_err(
	err: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
	sqlx::Error::Decode(Box::new(err))
}

/// Reads a stored timestamp.
///
/// Accepts unix seconds, RFC 3339 text and SQLite's `YYYY-MM-DD HH:MM:SS`
/// (UTC) format.
pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, chrono::ParseError> {
	let value = value.trim();
	if let Ok(secs) = value.parse::<i64>() {
		return Ok(Timestamp(secs));
	}
	if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
		return Ok(Timestamp::from_datetime(&naive.and_utc()));
	}
	DateTime::parse_from_rfc3339(value).map(|dt| Timestamp::from_datetime(&dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_timestamp_formats() {
		assert_eq!(parse_timestamp("1709287200").unwrap(), Timestamp(1_709_287_200));
		assert_eq!(parse_timestamp("2024-03-01T10:00:00Z").unwrap(), Timestamp(1_709_287_200));
		assert_eq!(parse_timestamp("2024-03-01T05:00:00-05:00").unwrap(), Timestamp(1_709_287_200));
		assert_eq!(parse_timestamp("2024-03-01 10:00:00").unwrap(), Timestamp(1_709_287_200));
	}

	#[test]
	fn test_parse_timestamp_rejects_garbage() {
		assert!(parse_timestamp("yesterday").is_err());
		assert!(parse_timestamp("").is_err());
	}
}

// vim: ts=4
