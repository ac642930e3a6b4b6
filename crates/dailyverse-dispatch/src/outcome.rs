//! Per-subscriber results and the sweep summary

use chrono::NaiveDate;
use std::fmt;

use crate::prelude::*;
use dailyverse_types::types::short_token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	UnknownTimezone,
	AlreadySentToday,
	NoContent,
}

#[derive(Debug)]
pub enum Outcome {
	/// The gateway accepted the notification. `recorded` is false when the
	/// sent marker could not be written (the next sweep may send again).
	Delivered { recorded: bool },
	Skipped(SkipReason),
	Failed(Error),
}

impl Outcome {
	pub fn label(&self) -> &'static str {
		match self {
			Outcome::Delivered { recorded: true } => "delivered",
			Outcome::Delivered { recorded: false } => "delivered-unrecorded",
			Outcome::Skipped(SkipReason::UnknownTimezone) => "skipped-unknown-timezone",
			Outcome::Skipped(SkipReason::AlreadySentToday) => "skipped-already-sent-today",
			Outcome::Skipped(SkipReason::NoContent) => "skipped-no-content",
			Outcome::Failed(_) => "failed",
		}
	}
}

/// What happened to one subscriber during a sweep
#[derive(Debug)]
pub struct NotificationResult {
	pub device_token: Box<str>,
	pub timezone: Box<str>,
	/// Subscriber's local date, if the timezone could be resolved
	pub local_date: Option<NaiveDate>,
	pub outcome: Outcome,
}

impl NotificationResult {
	pub fn log(&self) {
		let device = short_token(&self.device_token);
		let local_date = self.local_date.map(|d| d.to_string()).unwrap_or_default();
		match &self.outcome {
			Outcome::Delivered { recorded: true } | Outcome::Skipped(SkipReason::AlreadySentToday) => {
				info!(device, tz = %self.timezone, local_date, outcome = self.outcome.label());
			}
			Outcome::Delivered { recorded: false }
			| Outcome::Skipped(SkipReason::UnknownTimezone | SkipReason::NoContent) => {
				warn!(device, tz = %self.timezone, local_date, outcome = self.outcome.label());
			}
			Outcome::Failed(err) => {
				error!(
					device,
					tz = %self.timezone,
					local_date,
					outcome = self.outcome.label(),
					reason = %err
				);
			}
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
	pub total: usize,
	pub delivered: usize,
	/// Delivered, but the sent marker could not be stored
	pub unrecorded: usize,
	pub already_sent: usize,
	pub unknown_timezone: usize,
	pub no_content: usize,
	pub failed: usize,
}

impl SweepReport {
	pub fn record(&mut self, outcome: &Outcome) {
		self.total += 1;
		match outcome {
			Outcome::Delivered { recorded } => {
				self.delivered += 1;
				if !recorded {
					self.unrecorded += 1;
				}
			}
			Outcome::Skipped(SkipReason::AlreadySentToday) => self.already_sent += 1,
			Outcome::Skipped(SkipReason::UnknownTimezone) => self.unknown_timezone += 1,
			Outcome::Skipped(SkipReason::NoContent) => self.no_content += 1,
			Outcome::Failed(_) => self.failed += 1,
		}
	}

	pub fn skipped(&self) -> usize {
		self.already_sent + self.unknown_timezone + self.no_content
	}
}

impl fmt::Display for SweepReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"total={} delivered={} (unrecorded={}) skipped={} (already_sent={} unknown_tz={} no_content={}) failed={}",
			self.total,
			self.delivered,
			self.unrecorded,
			self.skipped(),
			self.already_sent,
			self.unknown_timezone,
			self.no_content,
			self.failed
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_report_counts() {
		let mut report = SweepReport::default();
		report.record(&Outcome::Delivered { recorded: true });
		report.record(&Outcome::Delivered { recorded: false });
		report.record(&Outcome::Skipped(SkipReason::AlreadySentToday));
		report.record(&Outcome::Skipped(SkipReason::UnknownTimezone));
		report.record(&Outcome::Skipped(SkipReason::NoContent));
		report.record(&Outcome::Failed(Error::DeliveryFailure { status: 410, body: "".into() }));

		assert_eq!(report.total, 6);
		assert_eq!(report.delivered, 2);
		assert_eq!(report.unrecorded, 1);
		assert_eq!(report.skipped(), 3);
		assert_eq!(report.failed, 1);
		assert_eq!(
			report.to_string(),
			"total=6 delivered=2 (unrecorded=1) skipped=3 (already_sent=1 unknown_tz=1 no_content=1) failed=1"
		);
	}

	#[test]
	fn test_labels() {
		assert_eq!(Outcome::Skipped(SkipReason::AlreadySentToday).label(), "skipped-already-sent-today");
		assert_eq!(Outcome::Failed(Error::NoContentAvailable).label(), "failed");
	}
}

// vim: ts=4
