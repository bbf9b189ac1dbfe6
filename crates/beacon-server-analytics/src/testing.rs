// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory database helpers for tests.

use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

pub async fn create_sessions_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS user_sessions (
			id TEXT PRIMARY KEY,
			ip_address TEXT NOT NULL,
			user_agent TEXT NOT NULL,
			started_at TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_events_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS user_events (
			id TEXT PRIMARY KEY,
			session_id TEXT NOT NULL REFERENCES user_sessions(id),
			event_type TEXT NOT NULL,
			event_name TEXT NOT NULL,
			timestamp TEXT NOT NULL,
			event_data TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_events_timestamp ON user_events(timestamp)")
		.execute(pool)
		.await
		.unwrap();
}

pub async fn create_aggregates_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS event_aggregates (
			id TEXT PRIMARY KEY,
			event_type TEXT NOT NULL,
			event_name TEXT NOT NULL,
			period_type TEXT NOT NULL,
			period_start TEXT NOT NULL,
			device_type TEXT,
			count INTEGER NOT NULL DEFAULT 0,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL,
			UNIQUE (event_type, event_name, period_type, period_start, device_type)
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_event_aggregates_period ON event_aggregates(period_type, period_start)",
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_analytics_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	create_sessions_table(&pool).await;
	create_events_table(&pool).await;
	create_aggregates_table(&pool).await;
	pool
}
