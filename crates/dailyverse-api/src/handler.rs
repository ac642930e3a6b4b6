//! Request handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiState, prelude::*};
use dailyverse_types::types::{Passage, Registration, Subscriber, short_token};

/// `/verse/random` does not restrict the verse length
const RANDOM_VERSE_MAX_LEN: usize = usize::MAX;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
	#[serde(default)]
	pub device_token: String,
	#[serde(default)]
	pub timezone: String,
	#[serde(default)]
	pub send_hour: i64,
}

impl SubscribeRequest {
	/// The timezone is stored as given and only resolved by the sweep
	pub fn validate(self) -> DvResult<Registration> {
		if self.device_token.is_empty() || self.timezone.is_empty() {
			return Err(Error::ValidationError("device_token and timezone are required".into()));
		}
		let send_hour = u8::try_from(self.send_hour)
			.ok()
			.filter(|h| *h <= 23)
			.ok_or_else(|| Error::ValidationError("send_hour must be between 0 and 23".into()))?;

		Ok(Registration {
			device_token: self.device_token.into(),
			timezone: self.timezone.into(),
			send_hour,
		})
	}
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
	pub success: bool,
	pub rows_deleted: u64,
}

pub async fn health() -> Json<serde_json::Value> {
	Json(json!({ "status": "ok" }))
}

pub async fn get_random_verse(State(app): State<ApiState>) -> DvResult<Json<Passage>> {
	let passage = app.content.select_passage(RANDOM_VERSE_MAX_LEN).await?;
	Ok(Json(passage))
}

pub async fn post_subscribe(
	State(app): State<ApiState>,
	body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> DvResult<Json<serde_json::Value>> {
	let Json(req) = body.map_err(|err| {
		debug!("rejected subscribe body: {}", err);
		Error::ValidationError("invalid request body".into())
	})?;
	let registration = req.validate()?;

	app.store.upsert(&registration).await?;
	info!(
		device = %short_token(&registration.device_token),
		tz = %registration.timezone,
		send_hour = registration.send_hour,
		"device subscribed"
	);

	Ok(Json(json!({ "success": true })))
}

pub async fn list_subscriptions(State(app): State<ApiState>) -> DvResult<Json<Vec<Subscriber>>> {
	Ok(Json(app.store.list_all().await?))
}

pub async fn delete_subscriptions(State(app): State<ApiState>) -> DvResult<Json<DeleteResponse>> {
	let rows_deleted = app.store.delete_all().await?;
	warn!(rows_deleted, "all subscriptions deleted");
	Ok(Json(DeleteResponse { success: true, rows_deleted }))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn req(device_token: &str, timezone: &str, send_hour: i64) -> SubscribeRequest {
		SubscribeRequest { device_token: device_token.into(), timezone: timezone.into(), send_hour }
	}

	#[test]
	fn test_validate_accepts_hour_range() {
		for hour in [0, 8, 23] {
			let reg = req("abc", "America/New_York", hour).validate().unwrap();
			assert_eq!(i64::from(reg.send_hour), hour);
		}
	}

	#[test]
	fn test_validate_rejects() {
		assert!(matches!(req("", "UTC", 8).validate(), Err(Error::ValidationError(_))));
		assert!(matches!(req("abc", "", 8).validate(), Err(Error::ValidationError(_))));
		assert!(matches!(req("abc", "UTC", 24).validate(), Err(Error::ValidationError(_))));
		assert!(matches!(req("abc", "UTC", -1).validate(), Err(Error::ValidationError(_))));
		assert!(matches!(req("abc", "UTC", 1000).validate(), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_missing_send_hour_defaults_to_midnight() {
		let req: SubscribeRequest =
			serde_json::from_str(r#"{"device_token":"abc","timezone":"UTC"}"#).unwrap();
		assert_eq!(req.validate().unwrap().send_hour, 0);
	}
}

// vim: ts=4
