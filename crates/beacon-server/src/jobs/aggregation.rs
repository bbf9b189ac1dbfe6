// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background job wrapping the aggregation engine for one period kind.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use beacon_analytics_core::PeriodKind;
use beacon_server_analytics::{aggregate_period, SqliteAnalyticsRepository};

use crate::jobs::{Job, JobContext, JobError, JobOutput};

/// Periodic aggregation for a single period kind.
///
/// Each run accumulates the current bucket's events onto stored rows, so the
/// registration interval must be at least the bucket length (the config
/// defaults are exactly that).
pub struct AggregationJob {
	repository: Arc<SqliteAnalyticsRepository>,
	kind: PeriodKind,
	id: String,
	name: String,
}

impl AggregationJob {
	pub fn new(repository: Arc<SqliteAnalyticsRepository>, kind: PeriodKind) -> Self {
		Self {
			repository,
			kind,
			id: format!("aggregation-{kind}"),
			name: format!("{kind} event aggregation"),
		}
	}
}

#[async_trait]
impl Job for AggregationJob {
	fn id(&self) -> &str {
		&self.id
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> &str {
		"Aggregate user events into period rollups"
	}

	#[instrument(skip(self, ctx), fields(job_id = %self.id))]
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError> {
		if ctx.cancellation_token.is_cancelled() {
			return Err(JobError::Cancelled);
		}

		let summary = aggregate_period(self.repository.as_ref(), self.kind, Utc::now())
			.await
			.map_err(|e| JobError::Failed(format!("aggregation failed: {e}")))?;

		Ok(JobOutput {
			message: format!(
				"Aggregated {} events into {} groups for {} bucket {}",
				summary.total_events,
				summary.aggregated_groups,
				summary.period_kind,
				summary.period_start.to_rfc3339()
			),
			metadata: Some(serde_json::json!({
				"period_type": summary.period_kind.to_string(),
				"period_start": summary.period_start.to_rfc3339(),
				"total_events": summary.total_events,
				"aggregated_groups": summary.aggregated_groups,
				"skipped_events": summary.skipped_events,
			})),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use beacon_analytics_core::{Event, Session};
	use beacon_server_analytics::testing::create_analytics_test_pool;
	use beacon_server_analytics::AnalyticsRepository;
	use crate::jobs::context::CancellationToken;

	async fn seeded_repo() -> Arc<SqliteAnalyticsRepository> {
		let repo = Arc::new(SqliteAnalyticsRepository::new(
			create_analytics_test_pool().await,
		));
		let session = Session::new("127.0.0.1".to_string(), "test-agent".to_string());
		repo.create_session(&session).await.unwrap();
		repo
			.insert_event(&Event::new(
				session.id.clone(),
				"click".to_string(),
				"signup_button".to_string(),
			))
			.await
			.unwrap();
		repo
	}

	fn test_ctx() -> JobContext {
		JobContext {
			run_id: "test-run".to_string(),
			cancellation_token: CancellationToken::new(),
		}
	}

	#[tokio::test]
	async fn test_job_runs_aggregation() {
		let repo = seeded_repo().await;
		let job = AggregationJob::new(Arc::clone(&repo), PeriodKind::Daily);
		assert_eq!(job.id(), "aggregation-daily");

		let output = job.run(&test_ctx()).await.unwrap();
		assert!(output.message.contains("1 events"));
		assert_eq!(
			repo
				.count_aggregates_for_period(PeriodKind::Daily)
				.await
				.unwrap(),
			1
		);
	}

	#[tokio::test]
	async fn test_cancelled_job_does_not_run() {
		let repo = seeded_repo().await;
		let job = AggregationJob::new(Arc::clone(&repo), PeriodKind::Daily);

		let ctx = test_ctx();
		ctx.cancellation_token.cancel();

		let err = job.run(&ctx).await.unwrap_err();
		assert!(matches!(err, JobError::Cancelled));
		assert_eq!(
			repo
				.count_aggregates_for_period(PeriodKind::Daily)
				.await
				.unwrap(),
			0
		);
	}
}
