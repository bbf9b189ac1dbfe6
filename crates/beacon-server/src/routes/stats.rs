// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stats read HTTP handlers.

use axum::{
	extract::{Query, State},
	response::IntoResponse,
};

use beacon_server_analytics::api::StatsQuery;
use beacon_server_analytics::{event_counts_impl, overview_impl, top_events_impl};

use crate::api::AppState;

/// GET /stats/overview - daily rollups, filtered/sorted/paginated.
#[tracing::instrument(skip(state, query))]
pub async fn overview(
	State(state): State<AppState>,
	Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
	overview_impl(state.analytics_state.clone(), query).await
}

/// GET /stats/event-counts - period rows for one event name.
#[tracing::instrument(skip(state, query))]
pub async fn event_counts(
	State(state): State<AppState>,
	Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
	event_counts_impl(state.analytics_state.clone(), query).await
}

/// GET /stats/top-events - most triggered events over the range.
#[tracing::instrument(skip(state, query))]
pub async fn top_events(
	State(state): State<AppState>,
	Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
	top_events_impl(state.analytics_state.clone(), query).await
}
