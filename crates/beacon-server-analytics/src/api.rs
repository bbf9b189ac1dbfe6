// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response payload types for the analytics HTTP surface.

use serde::{Deserialize, Serialize};

use crate::query::PageInfo;

/// Body of `POST /events`.
///
/// Required fields are modeled as `Option` so missing-field validation can
/// answer with the full required list instead of a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEventRequest {
	pub event_type: Option<String>,
	pub event_name: Option<String>,
	#[serde(default)]
	pub event_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackEventResponse {
	pub status: String,
	pub event_id: String,
	pub session_id: String,
}

/// Query string shared by the stats read endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
	pub range: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
	pub event_type: Option<String>,
	pub event_name: Option<String>,
	pub device_type: Option<String>,
	pub sort_by: Option<String>,
	pub sort_order: Option<String>,
	pub limit: Option<u32>,
}

/// One daily bucket row in the overview payload.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewRow {
	pub date: String,
	pub event_type: String,
	pub event_name: String,
	pub count: u64,
	pub device_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
	pub status: String,
	pub data: Vec<OverviewRow>,
	pub pagination: PageInfo,
}

/// One period row in the event-counts payload.
#[derive(Debug, Clone, Serialize)]
pub struct EventCountRow {
	pub period_start: String,
	pub period_type: String,
	pub count: u64,
	pub device_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventCountsResponse {
	pub status: String,
	pub data: Vec<EventCountRow>,
	pub pagination: PageInfo,
}

/// One summed row in the top-events payload.
#[derive(Debug, Clone, Serialize)]
pub struct TopEventRow {
	pub event_type: String,
	pub event_name: String,
	pub total_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopEventsResponse {
	pub status: String,
	pub data: Vec<TopEventRow>,
}

/// Summary of a manually triggered aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRunResponse {
	pub status: String,
	pub message: String,
	pub period_type: String,
	pub total_events: u64,
	pub aggregated_groups: u64,
}

/// Warning payload when there is nothing to aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateWarningResponse {
	pub status: String,
	pub message: String,
}

/// Error payload shared across the analytics surface.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsErrorResponse {
	pub error: String,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub required: Option<Vec<String>>,
}
