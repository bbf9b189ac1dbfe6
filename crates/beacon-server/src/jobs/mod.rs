// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background job scheduling.
//!
//! A deliberately small scheduler: periodic jobs with cancellation and
//! graceful shutdown. Jobs run on fixed intervals and perform no automatic
//! retries; a failed run is logged and the next tick tries again.

pub mod aggregation;
pub mod context;
pub mod scheduler;

pub use aggregation::AggregationJob;
pub use context::{CancellationToken, JobContext};
pub use scheduler::JobScheduler;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by job runs and scheduler operations.
#[derive(Debug, Error)]
pub enum JobError {
	/// Job observed its cancellation token
	#[error("job cancelled")]
	Cancelled,

	/// Job run failed
	#[error("job failed: {0}")]
	Failed(String),

	/// Unknown job id
	#[error("job not found: {0}")]
	NotFound(String),
}

/// Result of a successful job run.
#[derive(Debug, Clone)]
pub struct JobOutput {
	pub message: String,
	pub metadata: Option<serde_json::Value>,
}

/// A schedulable background job.
#[async_trait]
pub trait Job: Send + Sync {
	fn id(&self) -> &str;
	fn name(&self) -> &str;
	fn description(&self) -> &str;
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError>;
}
