//! Sweep orchestration

use chrono::{DateTime, NaiveDate, Utc};
use futures::{StreamExt, stream};
use std::sync::Arc;

use crate::due::{DueCheck, check_due, resolve_timezone};
use crate::outcome::{NotificationResult, Outcome, SkipReason, SweepReport};
use crate::prelude::*;
use dailyverse_types::{
	content_selector::ContentSelector, push_sender::PushSender,
	subscription_store::SubscriptionStore, types::Subscriber,
};

/// Longest passage text that fits a notification alert
pub const MAX_PASSAGE_LEN: usize = 120;
pub const NOTIFICATION_TITLE: &str = "Verse of the Day";
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct DispatchOpts {
	/// Subscribers processed at the same time, 1 is strictly sequential
	pub concurrency: usize,
	pub max_passage_len: usize,
	pub title: Box<str>,
}

impl Default for DispatchOpts {
	fn default() -> Self {
		Self {
			concurrency: DEFAULT_CONCURRENCY,
			max_passage_len: MAX_PASSAGE_LEN,
			title: NOTIFICATION_TITLE.into(),
		}
	}
}

#[derive(Debug)]
pub struct DispatchRunner {
	store: Arc<dyn SubscriptionStore>,
	content: Arc<dyn ContentSelector>,
	sender: Arc<dyn PushSender>,
	opts: DispatchOpts,
}

impl DispatchRunner {
	pub fn new(
		store: Arc<dyn SubscriptionStore>,
		content: Arc<dyn ContentSelector>,
		sender: Arc<dyn PushSender>,
	) -> Self {
		Self { store, content, sender, opts: DispatchOpts::default() }
	}

	pub fn with_opts(mut self, opts: DispatchOpts) -> Self {
		self.opts = opts;
		self
	}

	/// Runs one sweep at the current instant
	pub async fn run(&self) -> DvResult<SweepReport> {
		self.run_at(Utc::now()).await
	}

	/// Runs one sweep as if it started at `now`.
	///
	/// Per-subscriber problems end up in the report. Only a failure to load
	/// the subscriber list or a sweep-fatal error is returned as `Err`.
	pub async fn run_at(&self, now: DateTime<Utc>) -> DvResult<SweepReport> {
		info!("daily verse sweep started at {}", now.to_rfc3339());

		let subscribers = self
			.store
			.list_all()
			.await
			.inspect_err(|err| error!("failed to load subscribers: {}", err))?;
		info!("{} subscriber(s) loaded", subscribers.len());

		let mut report = SweepReport::default();
		let mut results = stream::iter(subscribers)
			.map(|sub| self.process(sub, now))
			.buffer_unordered(self.opts.concurrency.max(1));

		while let Some(result) = results.next().await {
			let result = result.inspect_err(|err| error!("sweep aborted: {}", err))?;
			result.log();
			report.record(&result.outcome);
		}

		info!("daily verse sweep finished: {}", report);
		Ok(report)
	}

	/// Takes one subscriber through the dispatch steps.
	///
	/// Returns `Err` only for sweep-fatal errors.
	pub async fn process(&self, sub: Subscriber, now: DateTime<Utc>) -> DvResult<NotificationResult> {
		let finish =
			|sub: Subscriber, local_date: Option<NaiveDate>, outcome: Outcome| NotificationResult {
				device_token: sub.device_token,
				timezone: sub.timezone,
				local_date,
				outcome,
			};

		let tz = match resolve_timezone(&sub.timezone) {
			Ok(tz) => tz,
			Err(_) => return Ok(finish(sub, None, Outcome::Skipped(SkipReason::UnknownTimezone))),
		};

		let today = match check_due(&sub, tz, now) {
			DueCheck::Due { today } => today,
			DueCheck::AlreadySentToday { today } => {
				return Ok(finish(sub, Some(today), Outcome::Skipped(SkipReason::AlreadySentToday)));
			}
		};

		let passage = match self.content.select_passage(self.opts.max_passage_len).await {
			Ok(passage) => passage,
			Err(err) if err.is_sweep_fatal() => return Err(err),
			Err(Error::NoContentAvailable) => {
				return Ok(finish(sub, Some(today), Outcome::Skipped(SkipReason::NoContent)));
			}
			Err(err) => {
				error!(device = %sub.short_token(), "content selection failed: {}", err);
				return Ok(finish(sub, Some(today), Outcome::Skipped(SkipReason::NoContent)));
			}
		};

		let body = format!("{} — {}", passage.text, passage.reference);
		match self.sender.send(&sub.device_token, &self.opts.title, &body).await {
			Ok(()) => (),
			Err(err) if err.is_sweep_fatal() => return Err(err),
			Err(err) => return Ok(finish(sub, Some(today), Outcome::Failed(err))),
		}

		// The notification is out; a failed write-back only risks a repeat
		let recorded = match self.store.mark_sent(&sub.device_token, today).await {
			Ok(()) => true,
			Err(err) => {
				warn!(device = %sub.short_token(), "failed to record delivery: {}", err);
				false
			}
		};

		Ok(finish(sub, Some(today), Outcome::Delivered { recorded }))
	}
}

// vim: ts=4
