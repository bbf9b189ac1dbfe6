// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use sqlx::SqlitePool;

use beacon_server_analytics::{AnalyticsState, SqliteAnalyticsRepository};
use beacon_server_config::{ServerConfig, SessionConfig};

use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub repository: Arc<SqliteAnalyticsRepository>,
	pub analytics_state: Arc<AnalyticsState<SqliteAnalyticsRepository>>,
	pub session_config: SessionConfig,
	pub pool: SqlitePool,
}

/// Creates the application state from a connected pool.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let repository = SqliteAnalyticsRepository::new(pool.clone());
	AppState {
		repository: Arc::new(repository.clone()),
		analytics_state: Arc::new(AnalyticsState::new(repository)),
		session_config: config.session.clone(),
		pool,
	}
}

/// Builds the HTTP router.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/events", post(routes::events::track_event))
		.route("/stats/overview", get(routes::stats::overview))
		.route("/stats/event-counts", get(routes::stats::event_counts))
		.route("/stats/top-events", get(routes::stats::top_events))
		.route(
			"/analytics/aggregate",
			post(routes::analytics::trigger_aggregation),
		)
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}
