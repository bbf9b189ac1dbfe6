// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Usage analytics server implementation for Beacon.
//!
//! This crate provides the server-side implementation of the analytics
//! system: the storage repository, the aggregation engine that rolls raw
//! events up into period buckets, and the query/handler layer that serves
//! filtered, sorted, paginated rollups.
//!
//! # Architecture
//!
//! - `repository` - database operations for sessions, events, and aggregates
//! - `aggregation` - the `aggregate_period` engine
//! - `query` - date-range resolution, sort whitelisting, pagination
//! - `handlers` - transport-agnostic handler implementations
//! - `api` - request/response payload types
//!
//! # Example
//!
//! ```ignore
//! use beacon_server_analytics::{aggregate_period, AnalyticsRepository, SqliteAnalyticsRepository};
//! use beacon_analytics_core::PeriodKind;
//!
//! let repo = SqliteAnalyticsRepository::new(pool);
//! let summary = aggregate_period(&repo, PeriodKind::Daily, chrono::Utc::now()).await?;
//! println!("{} events in {} groups", summary.total_events, summary.aggregated_groups);
//! ```

pub mod aggregation;
pub mod api;
pub mod error;
pub mod handlers;
pub mod query;
pub mod repository;
pub mod testing;

pub use aggregation::{aggregate_period, AggregationSummary};
pub use error::{AnalyticsServerError, Result};
pub use handlers::aggregate::trigger_aggregation_impl;
pub use handlers::events::track_event_impl;
pub use handlers::stats::{event_counts_impl, overview_impl, top_events_impl};
pub use handlers::AnalyticsState;
pub use query::{DateRange, PageInfo, PageParams, SortField, SortOrder};
pub use repository::{AggregateFilter, AnalyticsRepository, EventTotal, SqliteAnalyticsRepository};

// Re-export core types for convenience
pub use beacon_analytics_core::*;
