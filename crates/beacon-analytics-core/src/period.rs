// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Period kinds and bucket boundary computation.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Rollup period kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
	/// Calendar day buckets
	Daily,
	/// Calendar week buckets, Monday-start
	Weekly,
	/// Calendar month buckets
	Monthly,
}

impl PeriodKind {
	/// All period kinds, in bucket-length order.
	pub const ALL: [PeriodKind; 3] = [PeriodKind::Daily, PeriodKind::Weekly, PeriodKind::Monthly];

	/// Computes the canonical bucket start for a reference instant.
	///
	/// Always truncated to day granularity at 00:00:00 UTC:
	/// - `Daily`: the reference date
	/// - `Weekly`: the most recent Monday (inclusive)
	/// - `Monthly`: the first day of the reference month
	#[must_use]
	pub fn bucket_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
		let day = now.date_naive();
		let bucket_day = match self {
			PeriodKind::Daily => day,
			PeriodKind::Weekly => day - Duration::days(i64::from(day.weekday().num_days_from_monday())),
			PeriodKind::Monthly => day.with_day(1).unwrap_or(day),
		};
		bucket_day.and_time(NaiveTime::MIN).and_utc()
	}
}

impl std::fmt::Display for PeriodKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PeriodKind::Daily => write!(f, "daily"),
			PeriodKind::Weekly => write!(f, "weekly"),
			PeriodKind::Monthly => write!(f, "monthly"),
		}
	}
}

impl std::str::FromStr for PeriodKind {
	type Err = crate::error::AnalyticsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"daily" => Ok(PeriodKind::Daily),
			"weekly" => Ok(PeriodKind::Weekly),
			"monthly" => Ok(PeriodKind::Monthly),
			_ => Err(crate::error::AnalyticsError::InvalidPeriodKind(
				s.to_string(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use proptest::prelude::*;

	fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
	}

	proptest! {
		#[test]
		fn period_kind_roundtrip(kind in prop_oneof![
			Just(PeriodKind::Daily),
			Just(PeriodKind::Weekly),
			Just(PeriodKind::Monthly),
		]) {
			let s = kind.to_string();
			let parsed: PeriodKind = s.parse().unwrap();
			prop_assert_eq!(kind, parsed);
		}
	}

	#[test]
	fn test_period_kind_parse_rejects_unknown() {
		assert!("hourly".parse::<PeriodKind>().is_err());
		assert!("".parse::<PeriodKind>().is_err());
		assert!("Daily".parse::<PeriodKind>().is_err());
	}

	#[test]
	fn test_daily_bucket_truncates_to_midnight() {
		let now = utc(2026, 8, 5, 14, 33, 7);
		assert_eq!(PeriodKind::Daily.bucket_start(now), utc(2026, 8, 5, 0, 0, 0));
	}

	#[test]
	fn test_weekly_bucket_starts_monday() {
		// 2026-08-05 is a Wednesday; the week started Monday 2026-08-03
		let now = utc(2026, 8, 5, 14, 33, 7);
		assert_eq!(
			PeriodKind::Weekly.bucket_start(now),
			utc(2026, 8, 3, 0, 0, 0)
		);
	}

	#[test]
	fn test_weekly_bucket_on_monday_is_same_day() {
		let now = utc(2026, 8, 3, 0, 0, 0);
		assert_eq!(
			PeriodKind::Weekly.bucket_start(now),
			utc(2026, 8, 3, 0, 0, 0)
		);
	}

	#[test]
	fn test_weekly_bucket_crosses_year_boundary() {
		// 2026-01-01 is a Thursday; the week started Monday 2025-12-29
		let now = utc(2026, 1, 1, 9, 0, 0);
		assert_eq!(
			PeriodKind::Weekly.bucket_start(now),
			utc(2025, 12, 29, 0, 0, 0)
		);
	}

	#[test]
	fn test_monthly_bucket_starts_first_of_month() {
		let now = utc(2026, 8, 31, 23, 59, 59);
		assert_eq!(
			PeriodKind::Monthly.bucket_start(now),
			utc(2026, 8, 1, 0, 0, 0)
		);
	}

	#[test]
	fn test_bucket_start_is_deterministic() {
		let now = utc(2026, 8, 5, 14, 33, 7);
		for kind in PeriodKind::ALL {
			assert_eq!(kind.bucket_start(now), kind.bucket_start(now));
		}
	}
}
