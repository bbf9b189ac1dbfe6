// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository layer for analytics database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use beacon_analytics_core::{
	AggregateId, DeviceClass, Event, EventAggregate, EventId, PeriodKind, Session, SessionId,
};

use crate::error::{AnalyticsServerError, Result};
use crate::query::{SortField, SortOrder};

/// Equality and range filters for aggregate queries.
#[derive(Debug, Clone, Default)]
pub struct AggregateFilter {
	pub period_kind: Option<PeriodKind>,
	pub event_type: Option<String>,
	pub event_name: Option<String>,
	pub device_type: Option<DeviceClass>,
	/// Inclusive period_start lower bound
	pub start: Option<DateTime<Utc>>,
	/// Inclusive period_start upper bound
	pub end: Option<DateTime<Utc>>,
}

/// Summed counts for one (event_type, event_name) pair across a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTotal {
	pub event_type: String,
	pub event_name: String,
	pub total_count: u64,
}

/// Repository trait for analytics operations.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
	// Session operations
	async fn create_session(&self, session: &Session) -> Result<()>;
	async fn find_session(&self, id: &SessionId) -> Result<Option<Session>>;

	// Event operations
	async fn insert_event(&self, event: &Event) -> Result<()>;
	async fn count_events(&self) -> Result<u64>;
	async fn list_events_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>>;

	// Aggregate writes: all rollups of one run are applied in a single
	// transaction, and each row accumulates onto any existing count via the
	// identity uniqueness constraint.
	async fn upsert_aggregates(&self, aggregates: &[EventAggregate]) -> Result<()>;

	// Aggregate reads
	async fn count_aggregates_for_period(&self, period_kind: PeriodKind) -> Result<u64>;
	async fn list_aggregates(
		&self,
		filter: &AggregateFilter,
		sort_field: SortField,
		sort_order: SortOrder,
		limit: u32,
		offset: u32,
	) -> Result<Vec<EventAggregate>>;
	async fn count_aggregates(&self, filter: &AggregateFilter) -> Result<u64>;
	async fn top_events(
		&self,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
		limit: u32,
	) -> Result<Vec<EventTotal>>;
}

/// SQLite implementation of the analytics repository.
#[derive(Clone)]
pub struct SqliteAnalyticsRepository {
	pool: SqlitePool,
}

impl SqliteAnalyticsRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

// Database row structs for mapping
#[derive(sqlx::FromRow)]
struct SessionRow {
	id: String,
	ip_address: String,
	user_agent: String,
	started_at: String,
	created_at: String,
	updated_at: String,
}

impl TryFrom<SessionRow> for Session {
	type Error = AnalyticsServerError;

	fn try_from(row: SessionRow) -> Result<Self> {
		Ok(Session {
			id: SessionId(
				row
					.id
					.parse()
					.map_err(|_| AnalyticsServerError::InvalidData("invalid session ID".into()))?,
			),
			ip_address: row.ip_address,
			user_agent: row.user_agent,
			started_at: parse_timestamp(&row.started_at, "started_at")?,
			created_at: parse_timestamp(&row.created_at, "created_at")?,
			updated_at: parse_timestamp(&row.updated_at, "updated_at")?,
		})
	}
}

#[derive(sqlx::FromRow)]
struct EventRow {
	id: String,
	session_id: String,
	event_type: String,
	event_name: String,
	timestamp: String,
	event_data: Option<String>,
	created_at: String,
}

impl TryFrom<EventRow> for Event {
	type Error = AnalyticsServerError;

	fn try_from(row: EventRow) -> Result<Self> {
		Ok(Event {
			id: EventId(
				row
					.id
					.parse()
					.map_err(|_| AnalyticsServerError::InvalidData("invalid event ID".into()))?,
			),
			session_id: SessionId(
				row
					.session_id
					.parse()
					.map_err(|_| AnalyticsServerError::InvalidData("invalid session ID".into()))?,
			),
			event_type: row.event_type,
			event_name: row.event_name,
			timestamp: parse_timestamp(&row.timestamp, "timestamp")?,
			event_data: row.event_data.map(|s| serde_json::from_str(&s)).transpose()?,
			created_at: parse_timestamp(&row.created_at, "created_at")?,
		})
	}
}

#[derive(sqlx::FromRow)]
struct AggregateRow {
	id: String,
	event_type: String,
	event_name: String,
	period_type: String,
	period_start: String,
	device_type: Option<String>,
	count: i64,
	created_at: String,
	updated_at: String,
}

impl TryFrom<AggregateRow> for EventAggregate {
	type Error = AnalyticsServerError;

	fn try_from(row: AggregateRow) -> Result<Self> {
		Ok(EventAggregate {
			id: AggregateId(
				row
					.id
					.parse()
					.map_err(|_| AnalyticsServerError::InvalidData("invalid aggregate ID".into()))?,
			),
			event_type: row.event_type,
			event_name: row.event_name,
			period_kind: row
				.period_type
				.parse()
				.map_err(|e| AnalyticsServerError::InvalidData(format!("invalid period type: {e}")))?,
			period_start: parse_timestamp(&row.period_start, "period_start")?,
			device_type: row
				.device_type
				.map(|s| {
					s.parse().map_err(|e| {
						AnalyticsServerError::InvalidData(format!("invalid device type: {e}"))
					})
				})
				.transpose()?,
			count: row.count as u64,
			created_at: parse_timestamp(&row.created_at, "created_at")?,
			updated_at: parse_timestamp(&row.updated_at, "updated_at")?,
		})
	}
}

fn parse_timestamp(s: &str, field: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(s)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| AnalyticsServerError::InvalidData(format!("invalid {field}: {e}")))
}

/// Builds the WHERE clause for an aggregate filter.
///
/// Returns the clause text; bind order must match `bind_filter`.
fn filter_conditions(filter: &AggregateFilter) -> String {
	let mut conditions = vec!["1=1".to_string()];
	if filter.period_kind.is_some() {
		conditions.push("period_type = ?".to_string());
	}
	if filter.event_type.is_some() {
		conditions.push("event_type = ?".to_string());
	}
	if filter.event_name.is_some() {
		conditions.push("event_name = ?".to_string());
	}
	if filter.device_type.is_some() {
		conditions.push("device_type = ?".to_string());
	}
	if filter.start.is_some() {
		conditions.push("period_start >= ?".to_string());
	}
	if filter.end.is_some() {
		conditions.push("period_start <= ?".to_string());
	}
	conditions.join(" AND ")
}

/// Expands to the conditional bind chain matching `filter_conditions`.
macro_rules! bind_filter {
	($query:expr, $filter:expr) => {{
		let mut query = $query;
		if let Some(kind) = $filter.period_kind {
			query = query.bind(kind.to_string());
		}
		if let Some(event_type) = &$filter.event_type {
			query = query.bind(event_type);
		}
		if let Some(event_name) = &$filter.event_name {
			query = query.bind(event_name);
		}
		if let Some(device) = $filter.device_type {
			query = query.bind(device.to_string());
		}
		if let Some(start) = $filter.start {
			query = query.bind(start.to_rfc3339());
		}
		if let Some(end) = $filter.end {
			query = query.bind(end.to_rfc3339());
		}
		query
	}};
}

#[async_trait]
impl AnalyticsRepository for SqliteAnalyticsRepository {
	#[instrument(skip(self, session), fields(session_id = %session.id))]
	async fn create_session(&self, session: &Session) -> Result<()> {
		sqlx::query(
			r#"
			INSERT INTO user_sessions (id, ip_address, user_agent, started_at, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(&session.ip_address)
		.bind(&session.user_agent)
		.bind(session.started_at.to_rfc3339())
		.bind(session.created_at.to_rfc3339())
		.bind(session.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[instrument(skip(self), fields(session_id = %id))]
	async fn find_session(&self, id: &SessionId) -> Result<Option<Session>> {
		let row = sqlx::query_as::<_, SessionRow>(
			r#"
			SELECT id, ip_address, user_agent, started_at, created_at, updated_at
			FROM user_sessions
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
	async fn insert_event(&self, event: &Event) -> Result<()> {
		let event_data = event
			.event_data
			.as_ref()
			.map(serde_json::to_string)
			.transpose()?;

		sqlx::query(
			r#"
			INSERT INTO user_events (id, session_id, event_type, event_name, timestamp, event_data, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(event.id.to_string())
		.bind(event.session_id.to_string())
		.bind(&event.event_type)
		.bind(&event.event_name)
		.bind(event.timestamp.to_rfc3339())
		.bind(event_data)
		.bind(event.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[instrument(skip(self))]
	async fn count_events(&self) -> Result<u64> {
		let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_events")
			.fetch_one(&self.pool)
			.await?;

		Ok(row.0 as u64)
	}

	#[instrument(skip(self), fields(since = %since))]
	async fn list_events_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>> {
		let rows = sqlx::query_as::<_, EventRow>(
			r#"
			SELECT id, session_id, event_type, event_name, timestamp, event_data, created_at
			FROM user_events
			WHERE timestamp >= ?
			ORDER BY timestamp ASC
			"#,
		)
		.bind(since.to_rfc3339())
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self, aggregates), fields(group_count = aggregates.len()))]
	async fn upsert_aggregates(&self, aggregates: &[EventAggregate]) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		for aggregate in aggregates {
			sqlx::query(
				r#"
				INSERT INTO event_aggregates (
					id, event_type, event_name, period_type, period_start,
					device_type, count, created_at, updated_at
				)
				VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
				ON CONFLICT(event_type, event_name, period_type, period_start, device_type) DO UPDATE SET
					count = count + excluded.count,
					updated_at = excluded.updated_at
				"#,
			)
			.bind(aggregate.id.to_string())
			.bind(&aggregate.event_type)
			.bind(&aggregate.event_name)
			.bind(aggregate.period_kind.to_string())
			.bind(aggregate.period_start.to_rfc3339())
			.bind(aggregate.device_type.map(|d| d.to_string()))
			.bind(aggregate.count as i64)
			.bind(aggregate.created_at.to_rfc3339())
			.bind(aggregate.updated_at.to_rfc3339())
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;

		Ok(())
	}

	#[instrument(skip(self), fields(period_kind = %period_kind))]
	async fn count_aggregates_for_period(&self, period_kind: PeriodKind) -> Result<u64> {
		let row: (i64,) =
			sqlx::query_as("SELECT COUNT(*) FROM event_aggregates WHERE period_type = ?")
				.bind(period_kind.to_string())
				.fetch_one(&self.pool)
				.await?;

		Ok(row.0 as u64)
	}

	#[instrument(skip(self, filter))]
	async fn list_aggregates(
		&self,
		filter: &AggregateFilter,
		sort_field: SortField,
		sort_order: SortOrder,
		limit: u32,
		offset: u32,
	) -> Result<Vec<EventAggregate>> {
		let sql = format!(
			"SELECT id, event_type, event_name, period_type, period_start, \
			 device_type, count, created_at, updated_at \
			 FROM event_aggregates WHERE {} ORDER BY {} {} LIMIT ? OFFSET ?",
			filter_conditions(filter),
			sort_field.column(),
			sort_order.keyword()
		);

		let query = bind_filter!(sqlx::query_as::<_, AggregateRow>(&sql), filter)
			.bind(limit as i64)
			.bind(offset as i64);

		let rows = query.fetch_all(&self.pool).await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self, filter))]
	async fn count_aggregates(&self, filter: &AggregateFilter) -> Result<u64> {
		let sql = format!(
			"SELECT COUNT(*) as cnt FROM event_aggregates WHERE {}",
			filter_conditions(filter)
		);

		let row: (i64,) = bind_filter!(sqlx::query_as(&sql), filter)
			.fetch_one(&self.pool)
			.await?;

		Ok(row.0 as u64)
	}

	#[instrument(skip(self), fields(start = %start, end = %end))]
	async fn top_events(
		&self,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
		limit: u32,
	) -> Result<Vec<EventTotal>> {
		let rows = sqlx::query(
			r#"
			SELECT event_type, event_name, SUM(count) as total_count
			FROM event_aggregates
			WHERE period_start >= ? AND period_start <= ?
			GROUP BY event_type, event_name
			ORDER BY total_count DESC
			LIMIT ?
			"#,
		)
		.bind(start.to_rfc3339())
		.bind(end.to_rfc3339())
		.bind(limit as i64)
		.fetch_all(&self.pool)
		.await?;

		Ok(
			rows
				.into_iter()
				.map(|row| EventTotal {
					event_type: row.get("event_type"),
					event_name: row.get("event_name"),
					total_count: row.get::<i64, _>("total_count") as u64,
				})
				.collect(),
		)
	}
}
