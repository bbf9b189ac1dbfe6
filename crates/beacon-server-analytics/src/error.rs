// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics server.

use thiserror::Error;

/// Errors that can occur in the analytics server.
#[derive(Debug, Error)]
pub enum AnalyticsServerError {
	/// Database error
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	/// A custom date range was requested without both bounds
	#[error("start_date and end_date are required for a custom range")]
	MissingDateRange,

	/// An explicit date bound could not be parsed
	#[error("invalid date format: {0}")]
	InvalidDateFormat(String),

	/// Unknown sort field requested
	#[error("invalid sort field: {0}")]
	InvalidSortField(String),

	/// Unknown sort order requested
	#[error("invalid sort order: {0}")]
	InvalidSortOrder(String),

	/// Invalid row data read back from storage
	#[error("invalid data: {0}")]
	InvalidData(String),

	/// JSON serialization error
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),

	/// Core error
	#[error("analytics core error: {0}")]
	Core(#[from] beacon_analytics_core::AnalyticsError),
}

/// Result type for analytics server operations.
pub type Result<T> = std::result::Result<T, AnalyticsServerError>;
