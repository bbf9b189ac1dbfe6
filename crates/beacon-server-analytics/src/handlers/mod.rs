// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport-agnostic handler implementations.
//!
//! Route functions in the server binary extract transport concerns (cookies,
//! query strings, JSON bodies) and delegate here. Every impl takes the
//! resolved context explicitly; nothing is read from ambient state.

pub mod aggregate;
pub mod events;
pub mod stats;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::api::AnalyticsErrorResponse;
use crate::error::AnalyticsServerError;
use crate::repository::AnalyticsRepository;

/// Shared state handed to every handler implementation.
pub struct AnalyticsState<R: AnalyticsRepository> {
	pub repository: R,
}

impl<R: AnalyticsRepository> AnalyticsState<R> {
	pub fn new(repository: R) -> Self {
		Self { repository }
	}
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: &str) -> impl IntoResponse {
	(
		status,
		Json(AnalyticsErrorResponse {
			error: error.to_string(),
			message: message.to_string(),
			required: None,
		}),
	)
}

pub(crate) fn bad_request(error: &str, message: &str) -> impl IntoResponse {
	error_response(StatusCode::BAD_REQUEST, error, message)
}

pub(crate) fn internal_error(message: &str) -> impl IntoResponse {
	error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
}

/// Maps a query-parameter validation failure onto its 400 payload.
///
/// Storage errors are not validation failures and fall through to 500.
pub(crate) fn query_error_response(err: AnalyticsServerError) -> axum::response::Response {
	match &err {
		AnalyticsServerError::MissingDateRange => {
			bad_request("missing_date_range", &err.to_string()).into_response()
		}
		AnalyticsServerError::InvalidDateFormat(_) => {
			bad_request("invalid_date_format", &err.to_string()).into_response()
		}
		AnalyticsServerError::InvalidSortField(_) => {
			bad_request("invalid_sort_field", &err.to_string()).into_response()
		}
		AnalyticsServerError::InvalidSortOrder(_) => {
			bad_request("invalid_sort_order", &err.to_string()).into_response()
		}
		AnalyticsServerError::Core(core_err) => {
			bad_request("invalid_parameter", &core_err.to_string()).into_response()
		}
		_ => {
			tracing::error!(error = %err, "stats query failed");
			internal_error("Failed to query aggregates").into_response()
		}
	}
}
