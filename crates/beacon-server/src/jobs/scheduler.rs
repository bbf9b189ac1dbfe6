// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::jobs::context::{CancellationToken, JobContext};
use crate::jobs::{Job, JobError, JobOutput};

struct RegisteredJob {
	job: Arc<dyn Job>,
	interval: Duration,
	cancellation_token: CancellationToken,
}

/// In-process scheduler for periodic background jobs.
pub struct JobScheduler {
	jobs: HashMap<String, RegisteredJob>,
	shutdown_tx: broadcast::Sender<()>,
	handles: Mutex<Vec<JoinHandle<()>>>,
}

impl JobScheduler {
	pub fn new() -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		Self {
			jobs: HashMap::new(),
			shutdown_tx,
			handles: Mutex::new(Vec::new()),
		}
	}

	pub fn register_periodic(&mut self, job: Arc<dyn Job>, interval: Duration) {
		let id = job.id().to_string();
		self.jobs.insert(
			id,
			RegisteredJob {
				job,
				interval,
				cancellation_token: CancellationToken::new(),
			},
		);
	}

	/// Spawns one ticking task per registered job.
	#[instrument(skip(self))]
	pub async fn start(&self) {
		let mut handles = self.handles.lock().await;

		for (job_id, registered) in &self.jobs {
			let job = Arc::clone(&registered.job);
			let interval = registered.interval;
			let mut shutdown_rx = self.shutdown_tx.subscribe();
			let cancellation_token = registered.cancellation_token.clone();
			let job_id = job_id.clone();

			let handle = tokio::spawn(async move {
				loop {
					tokio::select! {
						_ = tokio::time::sleep(interval) => {
							if cancellation_token.is_cancelled() {
								continue;
							}
							let _ = run_job(&job, &cancellation_token).await;
						}
						_ = shutdown_rx.recv() => {
							info!(job_id = %job_id, "Shutting down periodic job");
							break;
						}
					}
				}
			});

			handles.push(handle);
		}

		info!(job_count = handles.len(), "Job scheduler started");
	}

	/// Runs a registered job immediately, outside its schedule.
	#[instrument(skip(self))]
	pub async fn trigger_job(&self, job_id: &str) -> Result<JobOutput, JobError> {
		let registered = self
			.jobs
			.get(job_id)
			.ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

		run_job(&registered.job, &registered.cancellation_token).await
	}

	#[instrument(skip(self))]
	pub async fn cancel_job(&self, job_id: &str) -> Result<(), JobError> {
		let registered = self
			.jobs
			.get(job_id)
			.ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

		registered.cancellation_token.cancel();
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn shutdown(&self) {
		let _ = self.shutdown_tx.send(());

		let mut handles = self.handles.lock().await;
		for handle in handles.drain(..) {
			let _ = handle.await;
		}

		info!("Job scheduler shut down");
	}

	pub fn job_ids(&self) -> Vec<String> {
		self.jobs.keys().cloned().collect()
	}
}

impl Default for JobScheduler {
	fn default() -> Self {
		Self::new()
	}
}

async fn run_job(
	job: &Arc<dyn Job>,
	cancellation_token: &CancellationToken,
) -> Result<JobOutput, JobError> {
	let ctx = JobContext {
		run_id: Uuid::now_v7().to_string(),
		cancellation_token: cancellation_token.clone(),
	};

	match job.run(&ctx).await {
		Ok(output) => {
			info!(job_id = %job.id(), run_id = %ctx.run_id, message = %output.message, "Job completed");
			Ok(output)
		}
		Err(JobError::Cancelled) => {
			info!(job_id = %job.id(), run_id = %ctx.run_id, "Job cancelled");
			Err(JobError::Cancelled)
		}
		Err(e) => {
			warn!(job_id = %job.id(), run_id = %ctx.run_id, error = %e, "Job failed");
			Err(e)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicU32, Ordering};

	struct MockJob {
		id: String,
		runs: Arc<AtomicU32>,
	}

	impl MockJob {
		fn new(id: &str) -> Self {
			Self {
				id: id.to_string(),
				runs: Arc::new(AtomicU32::new(0)),
			}
		}
	}

	#[async_trait]
	impl Job for MockJob {
		fn id(&self) -> &str {
			&self.id
		}

		fn name(&self) -> &str {
			"Mock Job"
		}

		fn description(&self) -> &str {
			"A mock job for testing"
		}

		async fn run(&self, _ctx: &JobContext) -> Result<JobOutput, JobError> {
			self.runs.fetch_add(1, Ordering::SeqCst);
			Ok(JobOutput {
				message: "Mock job completed".to_string(),
				metadata: None,
			})
		}
	}

	#[tokio::test]
	async fn test_register_periodic_job() {
		let mut scheduler = JobScheduler::new();
		scheduler.register_periodic(Arc::new(MockJob::new("mock-1")), Duration::from_secs(60));

		assert!(scheduler.job_ids().contains(&"mock-1".to_string()));
	}

	#[tokio::test]
	async fn test_trigger_job_runs_immediately() {
		let job = Arc::new(MockJob::new("mock-2"));
		let runs = Arc::clone(&job.runs);

		let mut scheduler = JobScheduler::new();
		scheduler.register_periodic(job, Duration::from_secs(3600));

		let output = scheduler.trigger_job("mock-2").await.unwrap();
		assert_eq!(output.message, "Mock job completed");
		assert_eq!(runs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_trigger_unknown_job_is_not_found() {
		let scheduler = JobScheduler::new();
		let err = scheduler.trigger_job("nope").await.unwrap_err();
		assert!(matches!(err, JobError::NotFound(_)));
	}

	#[tokio::test]
	async fn test_shutdown_stops_spawned_tasks() {
		let mut scheduler = JobScheduler::new();
		scheduler.register_periodic(Arc::new(MockJob::new("mock-3")), Duration::from_secs(3600));

		scheduler.start().await;
		scheduler.shutdown().await;

		assert!(scheduler.handles.lock().await.is_empty());
	}
}
