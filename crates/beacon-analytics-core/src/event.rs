// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event types for user interaction tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionId;

/// Unique identifier for a tracked event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for EventId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for EventId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A single user interaction event.
///
/// Events are append-only: created by ingestion, never mutated, never deleted
/// by the core. `event_data` is an opaque JSON blob carried through storage
/// and never interpreted by aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
	pub id: EventId,
	pub session_id: SessionId,

	/// Category, e.g. "click" or "view"
	pub event_type: String,
	/// Specific name within the category, e.g. "signup_button"
	pub event_name: String,

	pub timestamp: DateTime<Utc>,
	pub event_data: Option<serde_json::Value>,

	pub created_at: DateTime<Utc>,
}

impl Event {
	/// Creates a new event stamped with the current time.
	#[must_use]
	pub fn new(session_id: SessionId, event_type: String, event_name: String) -> Self {
		let now = Utc::now();
		Self {
			id: EventId::new(),
			session_id,
			event_type,
			event_name,
			timestamp: now,
			event_data: None,
			created_at: now,
		}
	}

	/// Attaches an opaque payload (builder pattern).
	#[must_use]
	pub fn with_data(mut self, event_data: serde_json::Value) -> Self {
		self.event_data = Some(event_data);
		self
	}
}
