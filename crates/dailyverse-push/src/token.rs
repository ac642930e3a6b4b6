//! APNs provider authentication tokens
//!
//! The gateway accepts an ES256 signed JWT whose header names the signing key
//! (`kid`) and whose claims carry the team id (`iss`) and issue time (`iat`).
//! A token is rejected one hour after `iat`, and re-signing on every request
//! is throttled by the gateway, so a single token is shared until it gets
//! close to that limit.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use p256::pkcs8::DecodePrivateKey;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

use crate::config::ApnsConfig;
use crate::prelude::*;

/// Age after which a cached token is replaced (gateway limit is 60 minutes)
pub const TOKEN_REFRESH_SECS: i64 = 50 * 60;

/// A signed provider token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCredential {
	pub token: Box<str>,
	pub issued_at: Timestamp,
}

impl DispatchCredential {
	/// A token issued "in the future" (clock stepped back) is not trusted either
	pub fn is_fresh_at(&self, now: Timestamp) -> bool {
		(0..TOKEN_REFRESH_SECS).contains(&now.seconds_since(self.issued_at))
	}
}

#[derive(Serialize)]
struct ProviderClaims<'a> {
	iss: &'a str,
	iat: i64,
}

pub struct TokenSigner {
	team_id: Box<str>,
	key_id: Box<str>,
	key: EncodingKey,
	cached: RwLock<Option<DispatchCredential>>,
}

impl fmt::Debug for TokenSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenSigner")
			.field("team_id", &self.team_id)
			.field("key_id", &self.key_id)
			.field("cached", &self.cached.read().as_ref().map(|c| c.issued_at))
			.finish_non_exhaustive()
	}
}

impl TokenSigner {
	/// Parses and validates the key material up front.
	///
	/// The key must be a PKCS#8 PEM encoded P-256 private key.
	pub fn new(team_id: &str, key_id: &str, private_key_pem: &str) -> DvResult<Self> {
		if team_id.is_empty() {
			return Err(Error::MissingCredentialConfig("APNS_TEAM_ID"));
		}
		if key_id.is_empty() {
			return Err(Error::MissingCredentialConfig("APNS_KEY_ID"));
		}
		if private_key_pem.is_empty() {
			return Err(Error::MissingCredentialConfig("APNS_PRIVATE_KEY"));
		}

		// jsonwebtoken accepts any EC curve here, the curve check is done by p256
		p256::SecretKey::from_pkcs8_pem(private_key_pem)
			.map_err(|e| Error::InvalidKeyMaterial(format!("not a P-256 PKCS#8 key: {}", e)))?;
		let key = EncodingKey::from_ec_pem(private_key_pem.as_bytes())
			.map_err(|e| Error::InvalidKeyMaterial(format!("failed to load signing key: {}", e)))?;

		Ok(Self { team_id: team_id.into(), key_id: key_id.into(), key, cached: RwLock::new(None) })
	}

	pub fn from_config(config: &ApnsConfig) -> DvResult<Self> {
		Self::new(&config.team_id, &config.key_id, &config.private_key_pem)
	}

	/// Returns the cached token, re-signing it when it is about to expire
	pub fn credential(&self) -> DvResult<DispatchCredential> {
		self.credential_at(Timestamp::now())
	}

	pub fn credential_at(&self, now: Timestamp) -> DvResult<DispatchCredential> {
		if let Some(cached) = self.cached.read().as_ref().filter(|c| c.is_fresh_at(now)) {
			return Ok(cached.clone());
		}

		// Signing happens outside the lock. Concurrent callers may both sign,
		// the first one stored wins and the other token is simply dropped.
		let fresh = self.sign(now)?;

		let mut cached = self.cached.write();
		if let Some(current) = cached.as_ref().filter(|c| c.is_fresh_at(now)) {
			return Ok(current.clone());
		}
		debug!(key_id = %self.key_id, issued_at = %fresh.issued_at, "APNs provider token signed");
		*cached = Some(fresh.clone());
		Ok(fresh)
	}

	/// Drops the cached token so the next request signs a new one
	pub fn invalidate(&self) {
		*self.cached.write() = None;
	}

	fn sign(&self, now: Timestamp) -> DvResult<DispatchCredential> {
		let header = Header { kid: Some(self.key_id.to_string()), ..Header::new(Algorithm::ES256) };
		let claims = ProviderClaims { iss: &self.team_id, iat: now.0 };

		let token = jsonwebtoken::encode(&header, &claims, &self.key)
			.inspect_err(|err| error!("APNs token encode err: {}", err))
			.map_err(|e| Error::InvalidKeyMaterial(format!("signing failed: {}", e)))?;

		Ok(DispatchCredential { token: token.into(), issued_at: now })
	}
}


// vim: ts=4
