// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Beacon server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`BEACON_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use beacon_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub session: SessionConfig,
	pub jobs: JobsConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`BEACON_SERVER_*`)
/// 2. Config file (`/etc/beacon/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let session = layer.session.unwrap_or_default().finalize();
	let jobs = layer.jobs.unwrap_or_default().finalize();

	validate_config(&session, &jobs)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		aggregation_enabled = jobs.aggregation_enabled,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		logging,
		session,
		jobs,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(session: &SessionConfig, jobs: &JobsConfig) -> Result<(), ConfigError> {
	if session.cookie_name.is_empty() {
		return Err(ConfigError::Validation(
			"session cookie name must not be empty".to_string(),
		));
	}
	if session.cookie_max_age_days == 0 {
		return Err(ConfigError::Validation(
			"session cookie max age must be at least one day".to_string(),
		));
	}
	if jobs.aggregation_enabled
		&& (jobs.daily_aggregation_interval_secs == 0
			|| jobs.weekly_aggregation_interval_secs == 0
			|| jobs.monthly_aggregation_interval_secs == 0)
	{
		return Err(ConfigError::Validation(
			"aggregation intervals must be non-zero when aggregation is enabled".to_string(),
		));
	}
	Ok(())
}
