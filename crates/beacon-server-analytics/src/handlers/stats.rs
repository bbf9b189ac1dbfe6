// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use beacon_analytics_core::{DeviceClass, PeriodKind};

use crate::api::{
	EventCountRow, EventCountsResponse, OverviewResponse, OverviewRow, StatsQuery, TopEventRow,
	TopEventsResponse,
};
use crate::error::Result;
use crate::handlers::{bad_request, internal_error, query_error_response, AnalyticsState};
use crate::query::{DateRange, PageInfo, PageParams, SortField, SortOrder};
use crate::repository::{AggregateFilter, AnalyticsRepository};

const DEFAULT_TOP_LIMIT: u32 = 10;
const MAX_TOP_LIMIT: u32 = 100;

/// Parsed form of the shared stats query string.
struct StatsParams {
	range: DateRange,
	sort_field: SortField,
	sort_order: SortOrder,
	device_type: Option<DeviceClass>,
	pages: PageParams,
}

fn parse_stats_params(query: &StatsQuery) -> Result<StatsParams> {
	let range = DateRange::resolve(
		query.range.as_deref(),
		query.start_date.as_deref(),
		query.end_date.as_deref(),
		Utc::now(),
	)?;
	let sort_field = SortField::parse_param(query.sort_by.as_deref())?;
	let sort_order = SortOrder::parse_param(query.sort_order.as_deref())?;
	let device_type = query
		.device_type
		.as_deref()
		.map(str::parse::<DeviceClass>)
		.transpose()?;

	Ok(StatsParams {
		range,
		sort_field,
		sort_order,
		device_type,
		pages: PageParams {
			page: query.page,
			per_page: query.per_page,
		},
	})
}

/// Serves the daily-rollup overview: filtered, sorted, paginated.
#[instrument(skip(state, query))]
pub async fn overview_impl<R: AnalyticsRepository>(
	state: Arc<AnalyticsState<R>>,
	query: StatsQuery,
) -> impl IntoResponse {
	let params = match parse_stats_params(&query) {
		Ok(p) => p,
		Err(e) => return query_error_response(e),
	};

	let filter = AggregateFilter {
		period_kind: Some(PeriodKind::Daily),
		event_type: query.event_type.clone(),
		event_name: None,
		device_type: params.device_type,
		start: Some(params.range.start),
		end: Some(params.range.end),
	};

	let (rows, total) = match fetch_page(&state, &filter, &params).await {
		Ok(page) => page,
		Err(e) => return query_error_response(e),
	};

	let data = rows
		.into_iter()
		.map(|agg| OverviewRow {
			date: agg.period_start.date_naive().to_string(),
			event_type: agg.event_type,
			event_name: agg.event_name,
			count: agg.count,
			device_type: agg.device_type.map(|d| d.to_string()),
		})
		.collect();

	(
		StatusCode::OK,
		Json(OverviewResponse {
			status: "success".to_string(),
			data,
			pagination: PageInfo::new(&params.pages, total),
		}),
	)
		.into_response()
}

/// Serves per-period rows for one event name across all period kinds.
#[instrument(skip(state, query))]
pub async fn event_counts_impl<R: AnalyticsRepository>(
	state: Arc<AnalyticsState<R>>,
	query: StatsQuery,
) -> impl IntoResponse {
	let Some(event_name) = query.event_name.clone().filter(|n| !n.is_empty()) else {
		return bad_request("missing_event_name", "event_name is required").into_response();
	};

	let params = match parse_stats_params(&query) {
		Ok(p) => p,
		Err(e) => return query_error_response(e),
	};

	let filter = AggregateFilter {
		period_kind: None,
		event_type: query.event_type.clone(),
		event_name: Some(event_name),
		device_type: params.device_type,
		start: Some(params.range.start),
		end: Some(params.range.end),
	};

	let (rows, total) = match fetch_page(&state, &filter, &params).await {
		Ok(page) => page,
		Err(e) => return query_error_response(e),
	};

	let data = rows
		.into_iter()
		.map(|agg| EventCountRow {
			period_start: agg.period_start.to_rfc3339(),
			period_type: agg.period_kind.to_string(),
			count: agg.count,
			device_type: agg.device_type.map(|d| d.to_string()),
		})
		.collect();

	(
		StatusCode::OK,
		Json(EventCountsResponse {
			status: "success".to_string(),
			data,
			pagination: PageInfo::new(&params.pages, total),
		}),
	)
		.into_response()
}

/// Serves the top-N most triggered events over the range.
///
/// Pagination is ignored; counts are summed across device and period rows.
#[instrument(skip(state, query))]
pub async fn top_events_impl<R: AnalyticsRepository>(
	state: Arc<AnalyticsState<R>>,
	query: StatsQuery,
) -> impl IntoResponse {
	let range = match DateRange::resolve(
		query.range.as_deref(),
		query.start_date.as_deref(),
		query.end_date.as_deref(),
		Utc::now(),
	) {
		Ok(r) => r,
		Err(e) => return query_error_response(e),
	};

	let limit = query
		.limit
		.unwrap_or(DEFAULT_TOP_LIMIT)
		.clamp(1, MAX_TOP_LIMIT);

	let totals = match state.repository.top_events(range.start, range.end, limit).await {
		Ok(t) => t,
		Err(e) => {
			tracing::error!(error = %e, "failed to query top events");
			return internal_error("Failed to query top events").into_response();
		}
	};

	let data = totals
		.into_iter()
		.map(|t| TopEventRow {
			event_type: t.event_type,
			event_name: t.event_name,
			total_count: t.total_count,
		})
		.collect();

	(
		StatusCode::OK,
		Json(TopEventsResponse {
			status: "success".to_string(),
			data,
		}),
	)
		.into_response()
}

async fn fetch_page<R: AnalyticsRepository>(
	state: &Arc<AnalyticsState<R>>,
	filter: &AggregateFilter,
	params: &StatsParams,
) -> Result<(Vec<beacon_analytics_core::EventAggregate>, u64)> {
	let total = state.repository.count_aggregates(filter).await?;
	let rows = state
		.repository
		.list_aggregates(
			filter,
			params.sort_field,
			params.sort_order,
			params.pages.per_page(),
			params.pages.offset(),
		)
		.await?;
	Ok((rows, total))
}
