// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session types for browser session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for SessionId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for SessionId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A browser session that events are attributed to.
///
/// Sessions are created by the transport layer when a request arrives without
/// a recognized session cookie. They are immutable after creation except for
/// the bookkeeping timestamps; many events reference one session by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,

	/// Originating client address as observed by the transport
	pub ip_address: String,
	/// Raw User-Agent header, classified at aggregation time
	pub user_agent: String,

	pub started_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Session {
	/// Creates a new session stamped with the current time.
	#[must_use]
	pub fn new(ip_address: String, user_agent: String) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::new(),
			ip_address,
			user_agent,
			started_at: now,
			created_at: now,
			updated_at: now,
		}
	}

	/// Creates a new session with a caller-provided id.
	///
	/// Used when a client presents a well-formed session cookie that is not
	/// (or no longer) in the store; the session is recreated under the same
	/// id so the cookie stays valid.
	#[must_use]
	pub fn with_id(id: SessionId, ip_address: String, user_agent: String) -> Self {
		let now = Utc::now();
		Self {
			id,
			ip_address,
			user_agent,
			started_at: now,
			created_at: now,
			updated_at: now,
		}
	}
}
