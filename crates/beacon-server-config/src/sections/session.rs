// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session cookie configuration.

use serde::Deserialize;

/// Session configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct SessionConfig {
	pub cookie_name: String,
	pub cookie_max_age_days: u32,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			cookie_name: "session_id".to_string(),
			cookie_max_age_days: 30,
		}
	}
}

/// Session configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfigLayer {
	#[serde(default)]
	pub cookie_name: Option<String>,
	#[serde(default)]
	pub cookie_max_age_days: Option<u32>,
}

impl SessionConfigLayer {
	pub fn merge(&mut self, other: SessionConfigLayer) {
		if other.cookie_name.is_some() {
			self.cookie_name = other.cookie_name;
		}
		if other.cookie_max_age_days.is_some() {
			self.cookie_max_age_days = other.cookie_max_age_days;
		}
	}

	pub fn finalize(self) -> SessionConfig {
		let defaults = SessionConfig::default();
		SessionConfig {
			cookie_name: self.cookie_name.unwrap_or(defaults.cookie_name),
			cookie_max_age_days: self
				.cookie_max_age_days
				.unwrap_or(defaults.cookie_max_age_days),
		}
	}
}
