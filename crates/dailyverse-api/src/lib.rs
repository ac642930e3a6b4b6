//! HTTP API
//!
//! Device registration and verse lookup. The dispatch sweep runs in a
//! separate process against the same store.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
mod prelude;

use axum::{
	Router,
	routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use dailyverse_types::{content_selector::ContentSelector, subscription_store::SubscriptionStore};

#[derive(Debug, Clone)]
pub struct ApiState {
	pub store: Arc<dyn SubscriptionStore>,
	pub content: Arc<dyn ContentSelector>,
}

pub fn router(state: ApiState) -> Router {
	Router::new()
		.route("/health", get(handler::health))
		.route("/verse/random", get(handler::get_random_verse))
		.route("/verse/subscribe", post(handler::post_subscribe))
		.route(
			"/verse/subscriptions",
			get(handler::list_subscriptions).delete(handler::delete_subscriptions),
		)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

// vim: ts=4
