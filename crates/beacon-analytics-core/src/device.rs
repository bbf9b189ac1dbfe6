// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Device classification from user-agent strings.

use serde::{Deserialize, Serialize};

/// Substrings that mark a user-agent as a mobile device.
const MOBILE_TOKENS: [&str; 5] = ["mobile", "android", "iphone", "ipad", "ipod"];

/// Device class derived from a session's user-agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
	Mobile,
	Desktop,
}

impl DeviceClass {
	/// Classifies a user-agent string.
	///
	/// Case-insensitive substring match against the mobile token set; any hit
	/// classifies as `Mobile`, everything else (including the empty string)
	/// as `Desktop`. Total over all inputs.
	#[must_use]
	pub fn classify(user_agent: &str) -> DeviceClass {
		let ua = user_agent.to_ascii_lowercase();
		if MOBILE_TOKENS.iter().any(|token| ua.contains(token)) {
			DeviceClass::Mobile
		} else {
			DeviceClass::Desktop
		}
	}
}

impl std::fmt::Display for DeviceClass {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DeviceClass::Mobile => write!(f, "mobile"),
			DeviceClass::Desktop => write!(f, "desktop"),
		}
	}
}

impl std::str::FromStr for DeviceClass {
	type Err = crate::error::AnalyticsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"mobile" => Ok(DeviceClass::Mobile),
			"desktop" => Ok(DeviceClass::Desktop),
			_ => Err(crate::error::AnalyticsError::InvalidDeviceClass(
				s.to_string(),
			)),
		}
	}
}
