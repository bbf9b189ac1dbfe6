// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! End-to-end tests for the analytics HTTP surface.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePool;
use tower::ServiceExt;

use beacon_analytics_core::{DeviceClass, Event, EventAggregate, PeriodKind, Session};
use beacon_server::{create_app_state, create_router, AppState};
use beacon_server_analytics::AnalyticsRepository;
use beacon_server_config::ServerConfig;

async fn test_app() -> (Router, AppState) {
	let pool = SqlitePool::connect(":memory:").await.unwrap();
	beacon_server::db::run_migrations(&pool).await.unwrap();

	let state = create_app_state(pool, &ServerConfig::default());
	(create_router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
	app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn seed_session(state: &AppState, user_agent: &str) -> Session {
	let session = Session::new("127.0.0.1".to_string(), user_agent.to_string());
	state.repository.create_session(&session).await.unwrap();
	session
}

fn daily_aggregate(event_name: &str, count: u64) -> EventAggregate {
	EventAggregate::new(
		"click".to_string(),
		event_name.to_string(),
		PeriodKind::Daily,
		PeriodKind::Daily.bucket_start(chrono::Utc::now()),
		Some(DeviceClass::Desktop),
		count,
	)
}

#[tokio::test]
async fn track_event_success() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		post_json(
			"/events",
			serde_json::json!({
				"event_type": "click",
				"event_name": "test_button",
				"event_data": {"button_id": "test-btn"}
			}),
		),
	)
	.await;

	assert_eq!(response.status(), StatusCode::CREATED);
	assert!(response.headers().contains_key(header::SET_COOKIE));

	let data = body_json(response).await;
	assert_eq!(data["status"], "success");
	assert!(data["event_id"].is_string());
	assert!(data["session_id"].is_string());
}

#[tokio::test]
async fn track_event_reuses_cookie_session() {
	let (app, state) = test_app().await;
	let session = seed_session(&state, "test-agent").await;

	let mut request = post_json(
		"/events",
		serde_json::json!({"event_type": "click", "event_name": "test_button"}),
	);
	request.headers_mut().insert(
		header::COOKIE,
		format!("session_id={}", session.id).parse().unwrap(),
	);

	let response = send(&app, request).await;
	assert_eq!(response.status(), StatusCode::CREATED);
	// Recognized session: no new cookie is issued
	assert!(!response.headers().contains_key(header::SET_COOKIE));

	let data = body_json(response).await;
	assert_eq!(data["session_id"], session.id.to_string());
}

#[tokio::test]
async fn track_event_missing_fields() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		post_json("/events", serde_json::json!({"event_name": "test_button"})),
	)
	.await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let data = body_json(response).await;
	assert!(data["error"].is_string());
	assert_eq!(
		data["required"],
		serde_json::json!(["event_type", "event_name"])
	);
}

#[tokio::test]
async fn track_event_invalid_json() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/events")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from("invalid json"))
			.unwrap(),
	)
	.await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let data = body_json(response).await;
	assert!(data["error"].is_string());
}

#[tokio::test]
async fn track_event_wrong_content_type() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/events")
			.header(header::CONTENT_TYPE, "text/plain")
			.body(Body::from("event_type=click"))
			.unwrap(),
	)
	.await;

	assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
	let data = body_json(response).await;
	assert!(data["error"].is_string());
}

#[tokio::test]
async fn overview_stats_returns_seeded_rows() {
	let (app, state) = test_app().await;
	state
		.repository
		.upsert_aggregates(&[daily_aggregate("test_button", 1)])
		.await
		.unwrap();

	let response = send(&app, get("/stats/overview?range=7d")).await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["status"], "success");
	assert_eq!(data["data"].as_array().unwrap().len(), 1);
	assert_eq!(data["data"][0]["event_name"], "test_button");
	assert_eq!(data["data"][0]["device_type"], "desktop");
	assert!(data["pagination"].is_object());
}

#[tokio::test]
async fn overview_stats_filters_by_event_type() {
	let (app, state) = test_app().await;
	state
		.repository
		.upsert_aggregates(&[daily_aggregate("test_button", 1)])
		.await
		.unwrap();

	let response = send(&app, get("/stats/overview?range=7d&event_type=view")).await;
	let data = body_json(response).await;
	assert_eq!(data["data"].as_array().unwrap().len(), 0);

	let response = send(&app, get("/stats/overview?range=7d&event_type=click")).await;
	let data = body_json(response).await;
	assert_eq!(data["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn overview_stats_rejects_unknown_sort_field() {
	let (app, _state) = test_app().await;

	let response = send(&app, get("/stats/overview?range=7d&sort_by=password")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_counts_requires_event_name() {
	let (app, _state) = test_app().await;

	let response = send(&app, get("/stats/event-counts?range=7d")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let data = body_json(response).await;
	assert!(data["error"].is_string());
}

#[tokio::test]
async fn event_counts_returns_period_rows() {
	let (app, state) = test_app().await;
	state
		.repository
		.upsert_aggregates(&[daily_aggregate("test_button", 1)])
		.await
		.unwrap();

	let response = send(
		&app,
		get("/stats/event-counts?event_name=test_button&range=7d"),
	)
	.await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["status"], "success");
	assert_eq!(data["data"].as_array().unwrap().len(), 1);
	assert_eq!(data["data"][0]["period_type"], "daily");
	assert!(data["pagination"].is_object());
}

#[tokio::test]
async fn top_events_ranks_by_total_count() {
	let (app, state) = test_app().await;
	state
		.repository
		.upsert_aggregates(&[
			daily_aggregate("test_button", 5),
			daily_aggregate("other_button", 2),
		])
		.await
		.unwrap();

	let response = send(&app, get("/stats/top-events?limit=5&range=7d")).await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	let rows = data["data"].as_array().unwrap();
	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0]["event_name"], "test_button");
	assert_eq!(rows[0]["total_count"], 5);
}

#[tokio::test]
async fn aggregation_trigger_rolls_up_events() {
	let (app, state) = test_app().await;
	let session = seed_session(&state, "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)").await;
	state
		.repository
		.insert_event(&Event::new(
			session.id.clone(),
			"click".to_string(),
			"test_button".to_string(),
		))
		.await
		.unwrap();

	let response = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/analytics/aggregate?period_type=daily")
			.body(Body::empty())
			.unwrap(),
	)
	.await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["status"], "success");
	assert_eq!(data["period_type"], "daily");
	assert_eq!(data["total_events"], 1);
	assert_eq!(data["aggregated_groups"], 1);

	// The rollup landed in the mobile slice
	let overview = body_json(send(&app, get("/stats/overview?range=7d&device_type=mobile")).await).await;
	assert_eq!(overview["data"].as_array().unwrap().len(), 1);
	assert_eq!(overview["data"][0]["count"], 1);
}

#[tokio::test]
async fn aggregation_trigger_warns_when_no_events() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/analytics/aggregate?period_type=daily")
			.body(Body::empty())
			.unwrap(),
	)
	.await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["status"], "warning");
}

#[tokio::test]
async fn aggregation_trigger_rejects_invalid_period() {
	let (app, _state) = test_app().await;

	let response = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/analytics/aggregate?period_type=hourly")
			.body(Body::empty())
			.unwrap(),
	)
	.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let data = body_json(response).await;
	assert!(data["error"].is_string());
}

#[tokio::test]
async fn invalid_custom_range_is_rejected() {
	let (app, _state) = test_app().await;

	let response = send(&app, get("/stats/overview?range=custom")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let data = body_json(response).await;
	assert!(data["error"].is_string());

	let response = send(
		&app,
		get("/stats/overview?range=custom&start_date=yesterday&end_date=2026-08-04"),
	)
	.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pagination_splits_result_pages() {
	let (app, state) = test_app().await;

	let batch: Vec<EventAggregate> = (0..15)
		.map(|i| daily_aggregate(&format!("test_button_{i}"), 1))
		.collect();
	state.repository.upsert_aggregates(&batch).await.unwrap();

	let response = send(&app, get("/stats/overview?page=1&per_page=10")).await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["data"].as_array().unwrap().len(), 10);
	assert_eq!(data["pagination"]["pages"], 2);
	assert_eq!(data["pagination"]["total"], 15);

	let second = body_json(send(&app, get("/stats/overview?page=2&per_page=10")).await).await;
	assert_eq!(second["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn health_check_reports_ok() {
	let (app, _state) = test_app().await;

	let response = send(&app, get("/health")).await;
	assert_eq!(response.status(), StatusCode::OK);

	let data = body_json(response).await;
	assert_eq!(data["status"], "ok");
}
