// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background job configuration.

use serde::Deserialize;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Jobs configuration (runtime, fully resolved).
///
/// Aggregation re-reads a whole bucket and accumulates, so each interval must
/// be at least the bucket length; the defaults are exactly that.
#[derive(Debug, Clone)]
pub struct JobsConfig {
	pub aggregation_enabled: bool,
	pub daily_aggregation_interval_secs: u64,
	pub weekly_aggregation_interval_secs: u64,
	pub monthly_aggregation_interval_secs: u64,
}

impl Default for JobsConfig {
	fn default() -> Self {
		Self {
			aggregation_enabled: true,
			daily_aggregation_interval_secs: DAY_SECS,
			weekly_aggregation_interval_secs: 7 * DAY_SECS,
			monthly_aggregation_interval_secs: 30 * DAY_SECS,
		}
	}
}

/// Jobs configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsConfigLayer {
	#[serde(default)]
	pub aggregation_enabled: Option<bool>,
	#[serde(default)]
	pub daily_aggregation_interval_secs: Option<u64>,
	#[serde(default)]
	pub weekly_aggregation_interval_secs: Option<u64>,
	#[serde(default)]
	pub monthly_aggregation_interval_secs: Option<u64>,
}

impl JobsConfigLayer {
	pub fn merge(&mut self, other: JobsConfigLayer) {
		if other.aggregation_enabled.is_some() {
			self.aggregation_enabled = other.aggregation_enabled;
		}
		if other.daily_aggregation_interval_secs.is_some() {
			self.daily_aggregation_interval_secs = other.daily_aggregation_interval_secs;
		}
		if other.weekly_aggregation_interval_secs.is_some() {
			self.weekly_aggregation_interval_secs = other.weekly_aggregation_interval_secs;
		}
		if other.monthly_aggregation_interval_secs.is_some() {
			self.monthly_aggregation_interval_secs = other.monthly_aggregation_interval_secs;
		}
	}

	pub fn finalize(self) -> JobsConfig {
		let defaults = JobsConfig::default();
		JobsConfig {
			aggregation_enabled: self
				.aggregation_enabled
				.unwrap_or(defaults.aggregation_enabled),
			daily_aggregation_interval_secs: self
				.daily_aggregation_interval_secs
				.unwrap_or(defaults.daily_aggregation_interval_secs),
			weekly_aggregation_interval_secs: self
				.weekly_aggregation_interval_secs
				.unwrap_or(defaults.weekly_aggregation_interval_secs),
			monthly_aggregation_interval_secs: self
				.monthly_aggregation_interval_secs
				.unwrap_or(defaults.monthly_aggregation_interval_secs),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_match_bucket_lengths() {
		let config = JobsConfigLayer::default().finalize();
		assert!(config.aggregation_enabled);
		assert_eq!(config.daily_aggregation_interval_secs, DAY_SECS);
		assert_eq!(config.weekly_aggregation_interval_secs, 7 * DAY_SECS);
		assert_eq!(config.monthly_aggregation_interval_secs, 30 * DAY_SECS);
	}

	#[test]
	fn test_disable_aggregation() {
		let layer = JobsConfigLayer {
			aggregation_enabled: Some(false),
			..Default::default()
		};
		assert!(!layer.finalize().aggregation_enabled);
	}
}
