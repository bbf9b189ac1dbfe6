// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Aggregate types for period rollups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::DeviceClass;
use crate::period::PeriodKind;

/// Unique identifier for an aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateId(pub Uuid);

impl AggregateId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for AggregateId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for AggregateId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for AggregateId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A period rollup of events for one grouping key.
///
/// Identity is the tuple `(event_type, event_name, period_kind, period_start,
/// device_type)`; storage enforces at most one row per identity. `count` only
/// ever grows: the first aggregation run over a bucket creates the row and
/// later runs add onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAggregate {
	pub id: AggregateId,

	pub event_type: String,
	pub event_name: String,

	pub period_kind: PeriodKind,
	/// Bucket start instant, day-truncated (see `PeriodKind::bucket_start`)
	pub period_start: DateTime<Utc>,

	/// Device slot is nullable in the identity tuple
	pub device_type: Option<DeviceClass>,

	pub count: u64,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl EventAggregate {
	/// Creates an aggregate delta for one grouping key, stamped now.
	#[must_use]
	pub fn new(
		event_type: String,
		event_name: String,
		period_kind: PeriodKind,
		period_start: DateTime<Utc>,
		device_type: Option<DeviceClass>,
		count: u64,
	) -> Self {
		let now = Utc::now();
		Self {
			id: AggregateId::new(),
			event_type,
			event_name,
			period_kind,
			period_start,
			device_type,
			count,
			created_at: now,
			updated_at: now,
		}
	}
}
