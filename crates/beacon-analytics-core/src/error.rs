// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics core.

use thiserror::Error;

/// Errors that can occur in the analytics core.
#[derive(Debug, Error)]
pub enum AnalyticsError {
	/// Invalid period kind string
	#[error("invalid period kind: {0}")]
	InvalidPeriodKind(String),

	/// Invalid device class string
	#[error("invalid device class: {0}")]
	InvalidDeviceClass(String),
}
