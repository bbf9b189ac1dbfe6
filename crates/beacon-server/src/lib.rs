// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Beacon usage analytics server.
//!
//! This crate provides the HTTP server for event ingestion and rollup
//! queries, the SQLite bootstrap, the session cookie transport, and the
//! background job scheduler that triggers periodic aggregation.

pub mod api;
pub mod client_session;
pub mod db;
pub mod jobs;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
