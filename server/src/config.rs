//! Process configuration
//!
//! - `DB_PATH` - SQLite database file (`./bible_web.sqlite`)
//! - `DISPATCH_CONCURRENCY` - subscribers processed at once by a sweep (4)
//! - `LISTEN` - API listen address (`0.0.0.0:8080`)
//!
//! The push gateway settings are read separately by
//! [`dailyverse_push::ApnsConfig`].

use std::path::PathBuf;

use dailyverse_dispatch::runner::DEFAULT_CONCURRENCY;
use dailyverse_types::prelude::*;

pub const DEFAULT_DB_PATH: &str = "./bible_web.sqlite";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
	pub db_path: PathBuf,
	pub concurrency: usize,
	pub listen: Box<str>,
}

impl ServerConfig {
	pub fn from_env() -> DvResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DvResult<Self> {
		let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

		let db_path =
			non_empty("DB_PATH").map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);

		let concurrency = match non_empty("DISPATCH_CONCURRENCY") {
			None => DEFAULT_CONCURRENCY,
			Some(value) => match value.trim().parse::<usize>() {
				Ok(n) if n >= 1 => n,
				_ => {
					return Err(Error::ConfigError(format!(
						"DISPATCH_CONCURRENCY must be a positive integer, got {:?}",
						value
					)));
				}
			},
		};

		let listen: Box<str> =
			non_empty("LISTEN").map_or_else(|| DEFAULT_LISTEN.into(), String::into_boxed_str);

		Ok(Self { db_path, concurrency, listen })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> =
			pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
		assert_eq!(config.db_path, PathBuf::from("./bible_web.sqlite"));
		assert_eq!(config.concurrency, 4);
		assert_eq!(config.listen.as_ref(), "0.0.0.0:8080");
	}

	#[test]
	fn test_overrides() {
		let config = ServerConfig::from_lookup(lookup_from(&[
			("DB_PATH", "/var/lib/dailyverse/bible.sqlite"),
			("DISPATCH_CONCURRENCY", "16"),
			("LISTEN", "127.0.0.1:3000"),
		]))
		.unwrap();
		assert_eq!(config.db_path, PathBuf::from("/var/lib/dailyverse/bible.sqlite"));
		assert_eq!(config.concurrency, 16);
		assert_eq!(config.listen.as_ref(), "127.0.0.1:3000");
	}

	#[test]
	fn test_bad_concurrency() {
		for value in ["0", "-2", "many"] {
			let res = ServerConfig::from_lookup(lookup_from(&[("DISPATCH_CONCURRENCY", value)]));
			assert!(matches!(res, Err(Error::ConfigError(_))), "accepted {:?}", value);
		}
	}

	#[test]
	fn test_blank_means_default() {
		let config =
			ServerConfig::from_lookup(lookup_from(&[("DB_PATH", ""), ("DISPATCH_CONCURRENCY", " ")]))
				.unwrap();
		assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
		assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
	}
}

// vim: ts=4
