// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Aggregation trigger HTTP handler.

use axum::{
	extract::{Query, State},
	response::IntoResponse,
};
use serde::Deserialize;

use beacon_server_analytics::trigger_aggregation_impl;

use crate::api::AppState;

#[derive(Debug, Deserialize)]
pub struct AggregateParams {
	pub period_type: Option<String>,
}

/// POST /analytics/aggregate - run one aggregation pass synchronously.
///
/// The scheduled jobs call the same engine; this endpoint serves ad-hoc
/// triggers and tests.
#[tracing::instrument(skip(state))]
pub async fn trigger_aggregation(
	State(state): State<AppState>,
	Query(params): Query<AggregateParams>,
) -> impl IntoResponse {
	trigger_aggregation_impl(state.analytics_state.clone(), params.period_type).await
}
