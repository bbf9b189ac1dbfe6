// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Beacon usage analytics server binary.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beacon_analytics_core::PeriodKind;
use beacon_server::jobs::{AggregationJob, JobScheduler};
use beacon_server::{create_app_state, create_router};

/// Beacon server - HTTP server for usage analytics.
#[derive(Parser, Debug)]
#[command(name = "beacon-server", about = "Beacon usage analytics server", version)]
struct Args {
	/// Path to a TOML config file (overrides /etc/beacon/server.toml)
	#[arg(long)]
	config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = match args.config {
		Some(path) => beacon_server_config::load_config_with_file(path)?,
		None => beacon_server_config::load_config()?,
	};

	// Setup tracing
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting beacon-server"
	);

	// Create database pool and apply schema
	let pool = beacon_server::db::create_pool(&config.database.url).await?;
	beacon_server::db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);

	// Register aggregation jobs, one per period kind
	let mut scheduler = JobScheduler::new();
	if config.jobs.aggregation_enabled {
		let intervals = [
			(PeriodKind::Daily, config.jobs.daily_aggregation_interval_secs),
			(
				PeriodKind::Weekly,
				config.jobs.weekly_aggregation_interval_secs,
			),
			(
				PeriodKind::Monthly,
				config.jobs.monthly_aggregation_interval_secs,
			),
		];
		for (kind, interval_secs) in intervals {
			scheduler.register_periodic(
				Arc::new(AggregationJob::new(Arc::clone(&state.repository), kind)),
				Duration::from_secs(interval_secs),
			);
		}
		tracing::info!("Registered aggregation background jobs");
	}

	let scheduler = Arc::new(scheduler);
	scheduler.start().await;

	let app = create_router(state).layer(TraceLayer::new_for_http()).layer(
		CorsLayer::new()
			.allow_origin(Any)
			.allow_methods(Any)
			.allow_headers(Any),
	);

	// Start server
	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
			tracing::info!("Shutting down job scheduler...");
			scheduler.shutdown().await;
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
