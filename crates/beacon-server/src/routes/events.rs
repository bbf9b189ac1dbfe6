// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Event ingestion HTTP handler.

use axum::{
	extract::{rejection::JsonRejection, State},
	http::{header, HeaderMap, HeaderValue, StatusCode},
	response::IntoResponse,
	Json,
};

use beacon_server_analytics::api::{AnalyticsErrorResponse, TrackEventRequest};
use beacon_server_analytics::track_event_impl;

use crate::{api::AppState, client_session};

fn error_json(status: StatusCode, error: &str, message: &str) -> axum::response::Response {
	(
		status,
		Json(AnalyticsErrorResponse {
			error: error.to_string(),
			message: message.to_string(),
			required: None,
		}),
	)
		.into_response()
}

/// Maps a body rejection onto the analytics error shape.
///
/// A wrong content type is 415; anything else about the body is 400.
fn json_rejection_response(rejection: JsonRejection) -> axum::response::Response {
	match rejection {
		JsonRejection::MissingJsonContentType(_) => error_json(
			StatusCode::UNSUPPORTED_MEDIA_TYPE,
			"unsupported_media_type",
			"Content-Type must be application/json",
		),
		other => error_json(
			StatusCode::BAD_REQUEST,
			"invalid_json",
			&other.body_text(),
		),
	}
}

/// POST /events - record one user interaction event.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn track_event(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<TrackEventRequest>, JsonRejection>,
) -> impl IntoResponse {
	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(rejection) => return json_rejection_response(rejection),
	};

	let resolved = match client_session::resolve_session(
		state.repository.as_ref(),
		&state.session_config,
		&headers,
	)
	.await
	{
		Ok(resolved) => resolved,
		Err(e) => {
			tracing::error!(error = %e, "failed to resolve session");
			return error_json(
				StatusCode::INTERNAL_SERVER_ERROR,
				"internal_error",
				"Failed to resolve session",
			);
		}
	};

	let mut response = track_event_impl(state.analytics_state.clone(), &resolved.session, payload)
		.await
		.into_response();

	if resolved.issued {
		let cookie = client_session::session_cookie(&state.session_config, &resolved.session.id);
		if let Ok(value) = HeaderValue::from_str(&cookie) {
			response.headers_mut().insert(header::SET_COOKIE, value);
		}
	}

	response
}
