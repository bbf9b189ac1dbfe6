// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query machinery shared by the stats read operations: date-range
//! resolution, sort whitelisting, and pagination.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsServerError, Result};

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// Inclusive date range a stats query runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	pub start: DateTime<Utc>,
	pub end: DateTime<Utc>,
}

impl DateRange {
	/// Resolves the range parameters shared by all stats endpoints.
	///
	/// `range=7d` and `range=30d` are relative to `now`; any other value
	/// (including absent) requires both explicit bounds. Bounds accept an
	/// RFC 3339 instant or a bare `YYYY-MM-DD` date (taken at midnight UTC).
	pub fn resolve(
		range: Option<&str>,
		start_date: Option<&str>,
		end_date: Option<&str>,
		now: DateTime<Utc>,
	) -> Result<DateRange> {
		match range.unwrap_or("7d") {
			"7d" => Ok(DateRange {
				start: now - Duration::days(7),
				end: now,
			}),
			"30d" => Ok(DateRange {
				start: now - Duration::days(30),
				end: now,
			}),
			_ => {
				let (Some(start), Some(end)) = (start_date, end_date) else {
					return Err(AnalyticsServerError::MissingDateRange);
				};
				Ok(DateRange {
					start: parse_instant(start)?,
					end: parse_instant(end)?,
				})
			}
		}
	}
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
		return Ok(dt.with_timezone(&Utc));
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
		return Ok(dt.and_utc());
	}
	if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
		return Ok(date.and_time(NaiveTime::MIN).and_utc());
	}
	Err(AnalyticsServerError::InvalidDateFormat(s.to_string()))
}

/// Sortable aggregate columns.
///
/// A closed set: the caller's `sort_by` string is parsed into this enum and
/// only the enum ever reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
	#[default]
	PeriodStart,
	Count,
	EventType,
	EventName,
	DeviceType,
}

impl SortField {
	/// The column name used in ORDER BY.
	#[must_use]
	pub fn column(self) -> &'static str {
		match self {
			SortField::PeriodStart => "period_start",
			SortField::Count => "count",
			SortField::EventType => "event_type",
			SortField::EventName => "event_name",
			SortField::DeviceType => "device_type",
		}
	}

	/// Parses an optional caller-supplied sort field.
	pub fn parse_param(param: Option<&str>) -> Result<SortField> {
		match param {
			None => Ok(SortField::default()),
			Some("period_start") => Ok(SortField::PeriodStart),
			Some("count") => Ok(SortField::Count),
			Some("event_type") => Ok(SortField::EventType),
			Some("event_name") => Ok(SortField::EventName),
			Some("device_type") => Ok(SortField::DeviceType),
			Some(other) => Err(AnalyticsServerError::InvalidSortField(other.to_string())),
		}
	}
}

/// Sort direction; descending by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}

impl SortOrder {
	/// The keyword used in ORDER BY.
	#[must_use]
	pub fn keyword(self) -> &'static str {
		match self {
			SortOrder::Asc => "ASC",
			SortOrder::Desc => "DESC",
		}
	}

	/// Parses an optional caller-supplied sort order.
	pub fn parse_param(param: Option<&str>) -> Result<SortOrder> {
		match param {
			None => Ok(SortOrder::default()),
			Some("asc") => Ok(SortOrder::Asc),
			Some("desc") => Ok(SortOrder::Desc),
			Some(other) => Err(AnalyticsServerError::InvalidSortOrder(other.to_string())),
		}
	}
}

/// Offset pagination parameters, 1-indexed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

impl PageParams {
	/// Page number clamped to >= 1.
	#[must_use]
	pub fn page(&self) -> u32 {
		self.page.unwrap_or(1).max(1)
	}

	/// Page size clamped to 1..=100, defaulting to 10.
	#[must_use]
	pub fn per_page(&self) -> u32 {
		self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
	}

	/// Row offset of the first row on the page.
	#[must_use]
	pub fn offset(&self) -> u32 {
		(self.page() - 1) * self.per_page()
	}
}

/// Pagination block returned alongside every paginated payload.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
	pub page: u32,
	pub per_page: u32,
	pub total: u64,
	pub pages: u64,
}

impl PageInfo {
	/// Builds the pagination block for a result set of `total` rows.
	#[must_use]
	pub fn new(params: &PageParams, total: u64) -> Self {
		let per_page = params.per_page();
		Self {
			page: params.page(),
			per_page,
			total,
			pages: total.div_ceil(u64::from(per_page)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
	}

	#[test]
	fn test_resolve_default_is_seven_days() {
		let range = DateRange::resolve(None, None, None, now()).unwrap();
		assert_eq!(range.end, now());
		assert_eq!(range.start, now() - Duration::days(7));
	}

	#[test]
	fn test_resolve_thirty_days() {
		let range = DateRange::resolve(Some("30d"), None, None, now()).unwrap();
		assert_eq!(range.start, now() - Duration::days(30));
	}

	#[test]
	fn test_resolve_custom_requires_both_bounds() {
		let err = DateRange::resolve(Some("custom"), None, None, now()).unwrap_err();
		assert!(matches!(err, AnalyticsServerError::MissingDateRange));

		let err = DateRange::resolve(Some("custom"), Some("2026-08-01"), None, now()).unwrap_err();
		assert!(matches!(err, AnalyticsServerError::MissingDateRange));
	}

	#[test]
	fn test_resolve_custom_accepts_bare_dates() {
		let range = DateRange::resolve(
			Some("custom"),
			Some("2026-08-01"),
			Some("2026-08-04"),
			now(),
		)
		.unwrap();
		assert_eq!(range.start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
		assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 8, 4, 0, 0, 0).unwrap());
	}

	#[test]
	fn test_resolve_custom_accepts_rfc3339() {
		let range = DateRange::resolve(
			Some("custom"),
			Some("2026-08-01T06:30:00Z"),
			Some("2026-08-04T18:00:00+00:00"),
			now(),
		)
		.unwrap();
		assert_eq!(range.start, Utc.with_ymd_and_hms(2026, 8, 1, 6, 30, 0).unwrap());
		assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 8, 4, 18, 0, 0).unwrap());
	}

	#[test]
	fn test_resolve_rejects_garbage_dates() {
		let err = DateRange::resolve(
			Some("custom"),
			Some("yesterday"),
			Some("2026-08-04"),
			now(),
		)
		.unwrap_err();
		assert!(matches!(err, AnalyticsServerError::InvalidDateFormat(_)));
	}

	#[test]
	fn test_sort_field_parsing() {
		assert_eq!(SortField::parse_param(None).unwrap(), SortField::PeriodStart);
		assert_eq!(SortField::parse_param(Some("count")).unwrap(), SortField::Count);
		assert!(SortField::parse_param(Some("password")).is_err());
	}

	#[test]
	fn test_sort_order_parsing() {
		assert_eq!(SortOrder::parse_param(None).unwrap(), SortOrder::Desc);
		assert_eq!(SortOrder::parse_param(Some("asc")).unwrap(), SortOrder::Asc);
		assert!(SortOrder::parse_param(Some("sideways")).is_err());
	}

	#[test]
	fn test_page_params_defaults_and_clamping() {
		let params = PageParams {
			page: None,
			per_page: None,
		};
		assert_eq!(params.page(), 1);
		assert_eq!(params.per_page(), 10);
		assert_eq!(params.offset(), 0);

		let params = PageParams {
			page: Some(0),
			per_page: Some(500),
		};
		assert_eq!(params.page(), 1);
		assert_eq!(params.per_page(), 100);

		let params = PageParams {
			page: Some(3),
			per_page: Some(25),
		};
		assert_eq!(params.offset(), 50);
	}

	#[test]
	fn test_page_info_page_count() {
		let params = PageParams {
			page: Some(1),
			per_page: Some(10),
		};
		assert_eq!(PageInfo::new(&params, 15).pages, 2);
		assert_eq!(PageInfo::new(&params, 10).pages, 1);
		assert_eq!(PageInfo::new(&params, 0).pages, 0);
	}
}
