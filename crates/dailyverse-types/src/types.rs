//! Common types used throughout the dispatcher.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}

	pub fn from_datetime(dt: &DateTime<Utc>) -> Timestamp {
		Timestamp(dt.timestamp())
	}

	pub fn add_seconds(self, secs: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(secs))
	}

	/// Seconds elapsed since `earlier` (negative if `earlier` lies in the future)
	pub fn seconds_since(self, earlier: Timestamp) -> i64 {
		self.0.saturating_sub(earlier.0)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

/// Serialize a timestamp as an RFC 3339 string (API responses)
pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	match DateTime::<Utc>::from_timestamp(ts.0, 0) {
		Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
		None => serializer.serialize_i64(ts.0),
	}
}

// Subscriber //
//************//

/// One registered device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscriber {
	pub device_token: Box<str>,
	/// IANA timezone name, resolved only at dispatch time
	pub timezone: Box<str>,
	/// Preferred local send hour (0-23). Stored, not used for gating.
	pub send_hour: u8,
	pub last_sent_date: Option<NaiveDate>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub updated_at: Timestamp,
}

impl Subscriber {
	/// Shortened device token for log lines
	pub fn short_token(&self) -> &str {
		short_token(&self.device_token)
	}
}

/// Data accepted when a device (re-)registers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
	pub device_token: Box<str>,
	pub timezone: Box<str>,
	pub send_hour: u8,
}

/// Truncates a device token to its first 8 characters
pub fn short_token(token: &str) -> &str {
	match token.char_indices().nth(8) {
		Some((idx, _)) => &token[..idx],
		None => token,
	}
}

// Passage //
//*********//

/// A short verse selected for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
	pub text: Box<str>,
	/// "<Book> <chapter>:<verse>"
	pub reference: Box<str>,
}

impl Passage {
	pub fn new(text: impl Into<Box<str>>, book: &str, chapter: u32, verse: u32) -> Self {
		Self { text: text.into(), reference: format!("{} {}:{}", book, chapter, verse).into() }
	}
}


// vim: ts=4
