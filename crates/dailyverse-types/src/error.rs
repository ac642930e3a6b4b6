//! Error type shared by every crate in the workspace

use axum::{Json, http::StatusCode, response::IntoResponse};
use std::fmt;

pub type DvResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	DbError,
	ValidationError(String),
	Internal(String),

	// configuration (sweep-fatal)
	ConfigError(String),
	MissingCredentialConfig(&'static str),
	InvalidKeyMaterial(String),

	// per-subscriber, recoverable
	UnknownTimezone(Box<str>),
	NoContentAvailable,
	TransportFailure(String),
	DeliveryFailure { status: u16, body: Box<str> },

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Errors that make every further delivery pointless.
	///
	/// A sweep stops at the first one of these; everything else is contained
	/// at the subscriber boundary.
	pub fn is_sweep_fatal(&self) -> bool {
		matches!(
			self,
			Error::ConfigError(_) | Error::MissingCredentialConfig(_) | Error::InvalidKeyMaterial(_)
		)
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::DbError => write!(f, "database error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::MissingCredentialConfig(key) => {
				write!(f, "missing push credential configuration: {}", key)
			}
			Error::InvalidKeyMaterial(msg) => write!(f, "invalid key material: {}", msg),
			Error::UnknownTimezone(tz) => write!(f, "unknown timezone: {:?}", tz),
			Error::NoContentAvailable => write!(f, "no content available"),
			Error::TransportFailure(msg) => write!(f, "transport failure: {}", msg),
			Error::DeliveryFailure { status, body } => {
				write!(f, "delivery failure: status={} body={}", status, body)
			}
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Internal(format!("json: {}", err))
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, message) = match self {
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
			Error::NoContentAvailable => {
				(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch verse".to_string())
			}
			Error::DbError => (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string()),
			err => {
				tracing::error!("request failed: {}", err);
				(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
			}
		};
		(status, Json(serde_json::json!({ "error": message }))).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fatal_classification() {
		assert!(Error::ConfigError("APNS_ENV".into()).is_sweep_fatal());
		assert!(Error::MissingCredentialConfig("APNS_KEY_ID").is_sweep_fatal());
		assert!(Error::InvalidKeyMaterial("not P-256".into()).is_sweep_fatal());

		assert!(!Error::UnknownTimezone("Mars/Olympus".into()).is_sweep_fatal());
		assert!(!Error::NoContentAvailable.is_sweep_fatal());
		assert!(!Error::TransportFailure("timeout".into()).is_sweep_fatal());
		assert!(!Error::DeliveryFailure { status: 410, body: "".into() }.is_sweep_fatal());
		assert!(!Error::DbError.is_sweep_fatal());
	}

	#[test]
	fn test_response_status() {
		let res = Error::ValidationError("send_hour must be between 0 and 23".into()).into_response();
		assert_eq!(res.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			Error::NoContentAvailable.into_response().status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
		assert_eq!(Error::DbError.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn test_delivery_failure_display() {
		let err = Error::DeliveryFailure { status: 410, body: r#"{"reason":"Unregistered"}"#.into() };
		assert_eq!(err.to_string(), r#"delivery failure: status=410 body={"reason":"Unregistered"}"#);
	}
}

// vim: ts=4
