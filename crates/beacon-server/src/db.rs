// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database pool creation and schema bootstrap.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./beacon.db")
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
	let options = SqliteConnectOptions::from_str(database_url)?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Apply the schema. Every statement is idempotent, so this runs on each
/// startup.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
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
	.await?;

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
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_events_timestamp ON user_events(timestamp)")
		.execute(pool)
		.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_events_session ON user_events(session_id)")
		.execute(pool)
		.await?;

	// The UNIQUE constraint is the aggregate identity: at most one row per
	// (type, name, period, bucket, device) tuple, and the arbiter for
	// concurrent accumulate-upserts.
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
	.await?;

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_event_aggregates_period ON event_aggregates(period_type, period_start)",
	)
	.execute(pool)
	.await?;

	tracing::debug!("database migrations applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_migrations_are_idempotent() {
		let pool = SqlitePool::connect(":memory:").await.unwrap();
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let row: (i64,) =
			sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('user_sessions', 'user_events', 'event_aggregates')")
				.fetch_one(&pool)
				.await
				.unwrap();
		assert_eq!(row.0, 3);
	}
}
