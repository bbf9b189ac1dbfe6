// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use beacon_analytics_core::{Event, Session};

use crate::api::{AnalyticsErrorResponse, TrackEventRequest, TrackEventResponse};
use crate::handlers::{internal_error, AnalyticsState};
use crate::repository::AnalyticsRepository;

const REQUIRED_FIELDS: [&str; 2] = ["event_type", "event_name"];

fn missing_fields_response() -> impl IntoResponse {
	(
		StatusCode::BAD_REQUEST,
		Json(AnalyticsErrorResponse {
			error: "missing_required_fields".to_string(),
			message: "Missing required fields".to_string(),
			required: Some(REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect()),
		}),
	)
}

fn required_field(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

/// Records one user interaction event against an already-resolved session.
///
/// The transport resolves (or creates) the session before calling in; the
/// core never looks sessions up from ambient request state.
#[instrument(skip(state, session, payload), fields(session_id = %session.id))]
pub async fn track_event_impl<R: AnalyticsRepository>(
	state: Arc<AnalyticsState<R>>,
	session: &Session,
	payload: TrackEventRequest,
) -> impl IntoResponse {
	let (Some(event_type), Some(event_name)) = (
		required_field(payload.event_type),
		required_field(payload.event_name),
	) else {
		return missing_fields_response().into_response();
	};

	let mut event = Event::new(session.id.clone(), event_type, event_name);
	if let Some(event_data) = payload.event_data {
		event = event.with_data(event_data);
	}

	let event_id = event.id.to_string();
	if let Err(e) = state.repository.insert_event(&event).await {
		tracing::error!(error = %e, "failed to insert event");
		return internal_error("Failed to track event").into_response();
	}

	(
		StatusCode::CREATED,
		Json(TrackEventResponse {
			status: "success".to_string(),
			event_id,
			session_id: session.id.to_string(),
		}),
	)
		.into_response()
}
