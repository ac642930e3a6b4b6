//! APNs configuration
//!
//! All values come from the process environment:
//! - `APNS_TEAM_ID` - token issuer (developer team id)
//! - `APNS_KEY_ID` - id of the signing key, sent as `kid`
//! - `APNS_PRIVATE_KEY` - PEM encoded PKCS#8 P-256 private key
//! - `APNS_BUNDLE_ID` - app bundle id, sent as `apns-topic`
//! - `APNS_ENV` - target gateway, see [`ApnsEnv::parse`]

use std::fmt;

use crate::prelude::*;

pub const PRODUCTION_HOST: &str = "https://api.push.apple.com";
pub const SANDBOX_HOST: &str = "https://api.sandbox.push.apple.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApnsEnv {
	Production,
	Sandbox,
}

impl ApnsEnv {
	/// Parses the `APNS_ENV` value.
	///
	/// Unset or empty means production. Unknown values are rejected rather
	/// than silently routed to either gateway.
	pub fn parse(value: &str) -> DvResult<Self> {
		match value {
			"production" | "prod" | "" => Ok(ApnsEnv::Production),
			"sandbox" | "development" | "debug" => Ok(ApnsEnv::Sandbox),
			other => Err(Error::ConfigError(format!("invalid APNS_ENV: {:?}", other))),
		}
	}

	pub fn base_url(self) -> &'static str {
		match self {
			ApnsEnv::Production => PRODUCTION_HOST,
			ApnsEnv::Sandbox => SANDBOX_HOST,
		}
	}
}

#[derive(Clone)]
pub struct ApnsConfig {
	pub team_id: Box<str>,
	pub key_id: Box<str>,
	pub private_key_pem: Box<str>,
	pub bundle_id: Box<str>,
	pub env: ApnsEnv,
}

impl fmt::Debug for ApnsConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApnsConfig")
			.field("team_id", &self.team_id)
			.field("key_id", &self.key_id)
			.field("private_key_pem", &"<redacted>")
			.field("bundle_id", &self.bundle_id)
			.field("env", &self.env)
			.finish()
	}
}

impl ApnsConfig {
	pub fn from_env() -> DvResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key lookup
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DvResult<Self> {
		let required = |key: &'static str| -> DvResult<Box<str>> {
			match lookup(key) {
				Some(value) if !value.trim().is_empty() => Ok(value.into()),
				_ => Err(Error::MissingCredentialConfig(key)),
			}
		};

		let team_id = required("APNS_TEAM_ID")?;
		let key_id = required("APNS_KEY_ID")?;
		// Keys pasted into a single-line variable keep their newlines escaped
		let private_key_pem = required("APNS_PRIVATE_KEY")?.replace("\\n", "\n").into();
		let bundle_id = required("APNS_BUNDLE_ID")?;
		let env = ApnsEnv::parse(lookup("APNS_ENV").as_deref().unwrap_or(""))?;

		Ok(Self { team_id, key_id, private_key_pem, bundle_id, env })
	}
}


// vim: ts=4
