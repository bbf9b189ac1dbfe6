// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Beacon usage analytics system.
//!
//! This crate holds the plain data entities (sessions, events, aggregates)
//! and the pure functions that the aggregation engine is built on: period
//! bucketing and device classification. It has no storage or transport
//! dependencies; persistence lives behind the repository trait in
//! `beacon-server-analytics`.

pub mod aggregate;
pub mod device;
pub mod error;
pub mod event;
pub mod period;
pub mod session;

pub use aggregate::{AggregateId, EventAggregate};
pub use device::DeviceClass;
pub use error::AnalyticsError;
pub use event::{Event, EventId};
pub use period::PeriodKind;
pub use session::{Session, SessionId};
