// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP route handlers.
//!
//! Thin transport layer: each handler extracts cookies/query/body, then
//! delegates to the handler implementations in `beacon-server-analytics`.

pub mod analytics;
pub mod events;
pub mod health;
pub mod stats;
