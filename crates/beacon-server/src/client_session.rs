// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session cookie transport.
//!
//! The core never touches cookies or headers: this module resolves the
//! request's session (creating one when needed) and hands the plain
//! `Session` into the handler implementations.

use axum::http::HeaderMap;
use tracing::instrument;

use beacon_analytics_core::{Session, SessionId};
use beacon_server_analytics::{AnalyticsRepository, Result};
use beacon_server_config::SessionConfig;

/// A resolved session plus whether a fresh cookie must be issued.
pub struct ResolvedSession {
	pub session: Session,
	pub issued: bool,
}

/// Extracts a cookie value from the Cookie header.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	let cookies = headers.get("cookie")?.to_str().ok()?;
	cookies.split(';').find_map(|pair| {
		let (key, value) = pair.trim().split_once('=')?;
		(key == name).then_some(value)
	})
}

/// Extracts the client address and user-agent from request headers.
fn extract_client_info(headers: &HeaderMap) -> (String, String) {
	let ip_address = headers
		.get("x-forwarded-for")
		.and_then(|v| v.to_str().ok())
		.map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
		.or_else(|| {
			headers
				.get("x-real-ip")
				.and_then(|v| v.to_str().ok())
				.map(|s| s.to_string())
		})
		.unwrap_or_else(|| "unknown".to_string());

	let user_agent = headers
		.get("user-agent")
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default()
		.to_string();

	(ip_address, user_agent)
}

/// Resolves the request's session, creating and persisting one if the cookie
/// is absent or unknown.
///
/// A well-formed cookie id that is not in the store is reused for the new
/// session so the client's cookie stays stable.
#[instrument(skip(repo, config, headers))]
pub async fn resolve_session<R: AnalyticsRepository>(
	repo: &R,
	config: &SessionConfig,
	headers: &HeaderMap,
) -> Result<ResolvedSession> {
	let cookie_id = cookie_value(headers, &config.cookie_name)
		.and_then(|value| value.parse::<SessionId>().ok());

	if let Some(id) = &cookie_id {
		if let Some(session) = repo.find_session(id).await? {
			return Ok(ResolvedSession {
				session,
				issued: false,
			});
		}
	}

	let (ip_address, user_agent) = extract_client_info(headers);
	let session = match cookie_id {
		Some(id) => Session::with_id(id, ip_address, user_agent),
		None => Session::new(ip_address, user_agent),
	};
	repo.create_session(&session).await?;

	tracing::debug!(session_id = %session.id, "created new session");
	Ok(ResolvedSession {
		session,
		issued: true,
	})
}

/// Builds the Set-Cookie value for a session.
pub fn session_cookie(config: &SessionConfig, id: &SessionId) -> String {
	let max_age = u64::from(config.cookie_max_age_days) * 24 * 60 * 60;
	format!(
		"{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
		config.cookie_name, id, max_age
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::http::HeaderValue;
	use beacon_server_analytics::testing::create_analytics_test_pool;
	use beacon_server_analytics::SqliteAnalyticsRepository;

	fn headers_with_cookie(value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert("cookie", HeaderValue::from_str(value).unwrap());
		headers
	}

	#[test]
	fn test_cookie_value_parsing() {
		let headers = headers_with_cookie("theme=dark; session_id=abc123; lang=en");
		assert_eq!(cookie_value(&headers, "session_id"), Some("abc123"));
		assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
		assert_eq!(cookie_value(&headers, "missing"), None);
	}

	#[test]
	fn test_cookie_value_absent_header() {
		assert_eq!(cookie_value(&HeaderMap::new(), "session_id"), None);
	}

	#[test]
	fn test_extract_client_info_prefers_forwarded_for() {
		let mut headers = HeaderMap::new();
		headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
		headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
		headers.insert("user-agent", HeaderValue::from_static("test-agent"));

		let (ip, ua) = extract_client_info(&headers);
		assert_eq!(ip, "10.0.0.1");
		assert_eq!(ua, "test-agent");
	}

	#[test]
	fn test_extract_client_info_defaults() {
		let (ip, ua) = extract_client_info(&HeaderMap::new());
		assert_eq!(ip, "unknown");
		assert_eq!(ua, "");
	}

	#[test]
	fn test_session_cookie_format() {
		let config = SessionConfig::default();
		let id = SessionId::new();
		let cookie = session_cookie(&config, &id);
		assert!(cookie.starts_with(&format!("session_id={id}; Max-Age=2592000")));
		assert!(cookie.contains("HttpOnly"));
	}

	#[tokio::test]
	async fn test_resolve_session_creates_and_reuses() {
		let repo = SqliteAnalyticsRepository::new(create_analytics_test_pool().await);
		let config = SessionConfig::default();

		let resolved = resolve_session(&repo, &config, &HeaderMap::new())
			.await
			.unwrap();
		assert!(resolved.issued);

		let cookie = format!("session_id={}", resolved.session.id);
		let again = resolve_session(&repo, &config, &headers_with_cookie(&cookie))
			.await
			.unwrap();
		assert!(!again.issued);
		assert_eq!(again.session.id, resolved.session.id);
	}

	#[tokio::test]
	async fn test_resolve_session_reuses_unknown_wellformed_cookie_id() {
		let repo = SqliteAnalyticsRepository::new(create_analytics_test_pool().await);
		let config = SessionConfig::default();

		let id = SessionId::new();
		let cookie = format!("session_id={id}");
		let resolved = resolve_session(&repo, &config, &headers_with_cookie(&cookie))
			.await
			.unwrap();
		assert!(resolved.issued);
		assert_eq!(resolved.session.id, id);
	}
}
