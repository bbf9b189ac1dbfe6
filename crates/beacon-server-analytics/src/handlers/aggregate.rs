// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use beacon_analytics_core::PeriodKind;

use crate::aggregation::aggregate_period;
use crate::api::{AggregateRunResponse, AggregateWarningResponse};
use crate::handlers::{bad_request, internal_error, AnalyticsState};
use crate::repository::AnalyticsRepository;

/// Runs one aggregation pass synchronously and reports a summary.
///
/// The same engine call backs the scheduled background job; this entry point
/// exists for ad-hoc and test invocations. Each bucket should be aggregated
/// at most once per distinct set of events (the runs accumulate).
#[instrument(skip(state))]
pub async fn trigger_aggregation_impl<R: AnalyticsRepository>(
	state: Arc<AnalyticsState<R>>,
	period_type: Option<String>,
) -> impl IntoResponse {
	let kind = match period_type.as_deref().unwrap_or("daily").parse::<PeriodKind>() {
		Ok(kind) => kind,
		Err(_) => {
			return bad_request(
				"invalid_period_type",
				"Invalid period type. Must be one of: daily, weekly, monthly",
			)
			.into_response();
		}
	};

	let total_events = match state.repository.count_events().await {
		Ok(count) => count,
		Err(e) => {
			tracing::error!(error = %e, "failed to count events");
			return internal_error("Failed to trigger aggregation").into_response();
		}
	};

	if total_events == 0 {
		return (
			StatusCode::OK,
			Json(AggregateWarningResponse {
				status: "warning".to_string(),
				message: "No events found to aggregate".to_string(),
			}),
		)
			.into_response();
	}

	if let Err(e) = aggregate_period(&state.repository, kind, Utc::now()).await {
		tracing::error!(error = %e, period_kind = %kind, "aggregation run failed");
		return internal_error("Failed to trigger aggregation").into_response();
	}

	// Reported counts are cumulative for the period type, not per-run
	let aggregated_groups = match state.repository.count_aggregates_for_period(kind).await {
		Ok(count) => count,
		Err(e) => {
			tracing::error!(error = %e, "failed to count aggregates");
			return internal_error("Failed to trigger aggregation").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(AggregateRunResponse {
			status: "success".to_string(),
			message: format!("Aggregation completed for {kind} period"),
			period_type: kind.to_string(),
			total_events,
			aggregated_groups,
		}),
	)
		.into_response()
}
