// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The aggregation engine: rolls raw events up into period buckets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use beacon_analytics_core::{DeviceClass, EventAggregate, PeriodKind};

use crate::error::Result;
use crate::repository::AnalyticsRepository;

/// Key for grouping events into aggregates.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
struct GroupKey {
	event_type: String,
	event_name: String,
	device_type: DeviceClass,
}

/// Outcome of one aggregation run.
///
/// Side-effect-complete: carries everything a caller needs whether the run
/// was triggered synchronously over HTTP or from a background job.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationSummary {
	pub period_kind: PeriodKind,
	pub period_start: DateTime<Utc>,
	/// Events read from the bucket window
	pub total_events: u64,
	/// Distinct (type, name, device) groups written this run
	pub aggregated_groups: u64,
	/// Events dropped because their session no longer resolves
	pub skipped_events: u64,
}

/// Aggregates all events in the current `kind` bucket into rollup rows.
///
/// The engine re-reads the full bucket from its start on every run and ADDS
/// the recomputed group counts onto any stored rows, so a bucket must be
/// aggregated at most once per distinct set of events; the scheduler owns
/// that contract. Events whose session cannot be resolved are skipped, not
/// errors. All rollups of a run commit in a single transaction — a failed
/// run persists nothing.
#[instrument(skip(repo), fields(period_kind = %kind))]
pub async fn aggregate_period<R: AnalyticsRepository>(
	repo: &R,
	kind: PeriodKind,
	now: DateTime<Utc>,
) -> Result<AggregationSummary> {
	let period_start = kind.bucket_start(now);

	let events = repo.list_events_since(period_start).await?;
	if events.is_empty() {
		info!(
			period_start = %period_start.to_rfc3339(),
			"no events found in bucket, aggregation is a no-op"
		);
		return Ok(AggregationSummary {
			period_kind: kind,
			period_start,
			total_events: 0,
			aggregated_groups: 0,
			skipped_events: 0,
		});
	}

	let mut groups: HashMap<GroupKey, u64> = HashMap::new();
	let mut skipped_events = 0u64;

	for event in &events {
		let Some(session) = repo.find_session(&event.session_id).await? else {
			debug!(event_id = %event.id, session_id = %event.session_id, "skipping event with unresolvable session");
			skipped_events += 1;
			continue;
		};

		let device_type = DeviceClass::classify(&session.user_agent);

		let key = GroupKey {
			event_type: event.event_type.clone(),
			event_name: event.event_name.clone(),
			device_type,
		};
		*groups.entry(key).or_default() += 1;
	}

	let rollups: Vec<EventAggregate> = groups
		.into_iter()
		.map(|(key, count)| {
			EventAggregate::new(
				key.event_type,
				key.event_name,
				kind,
				period_start,
				Some(key.device_type),
				count,
			)
		})
		.collect();

	repo.upsert_aggregates(&rollups).await?;

	let summary = AggregationSummary {
		period_kind: kind,
		period_start,
		total_events: events.len() as u64,
		aggregated_groups: rollups.len() as u64,
		skipped_events,
	};

	info!(
		period_start = %period_start.to_rfc3339(),
		total_events = summary.total_events,
		aggregated_groups = summary.aggregated_groups,
		skipped_events = summary.skipped_events,
		"aggregation run completed"
	);

	Ok(summary)
}
