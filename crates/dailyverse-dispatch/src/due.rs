//! Due rule: one notification per subscriber per local calendar day

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::prelude::*;
use dailyverse_types::types::Subscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueCheck {
	/// Not sent yet on `today` (subscriber's local date)
	Due { today: NaiveDate },
	AlreadySentToday { today: NaiveDate },
}

pub fn resolve_timezone(name: &str) -> DvResult<Tz> {
	name.parse::<Tz>().map_err(|_| Error::UnknownTimezone(name.into()))
}

pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
	now.with_timezone(&tz).date_naive()
}

/// Applies the due rule at the sweep instant `now`.
///
/// The preferred send hour is deliberately not consulted: any subscriber not
/// yet served on their current local date is due.
pub fn check_due(subscriber: &Subscriber, tz: Tz, now: DateTime<Utc>) -> DueCheck {
	let today = local_date(now, tz);
	if subscriber.last_sent_date == Some(today) {
		DueCheck::AlreadySentToday { today }
	} else {
		DueCheck::Due { today }
	}
}


// vim: ts=4
