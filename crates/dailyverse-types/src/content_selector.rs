//! Adapter that picks the verse to send.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::Passage;

/// Interest categories a delivered passage is drawn from
pub const INTEREST_TAGS: [&str; 7] =
	["anxiety", "encouragement", "forgiveness", "healing", "hope", "peace", "stress"];

#[async_trait]
pub trait ContentSelector: Debug + Send + Sync {
	/// Returns one random tagged passage whose text is at most `max_len`
	/// characters, or `Error::NoContentAvailable`.
	async fn select_passage(&self, max_len: usize) -> DvResult<Passage>;
}

// vim: ts=4
