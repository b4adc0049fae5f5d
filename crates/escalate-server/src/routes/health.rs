// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use escalate_server_api::{ComponentStatus, HealthResponse, HealthStatus};

use crate::api::AppState;

#[utoipa::path(
	get,
	path = "/health",
	responses(
		(status = 200, description = "Healthy or degraded", body = HealthResponse),
		(status = 503, description = "Database unreachable", body = HealthResponse)
	),
	tag = "health"
)]
/// GET /health - database reachability plus mail and translator setup.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let (database, smtp) = tokio::join!(check_database(&state), check_smtp(&state));
	let translator = if state.translator.is_configured() {
		ComponentStatus::healthy()
	} else {
		ComponentStatus::with_message(HealthStatus::Degraded, "not configured")
	};

	let status = HealthResponse::aggregate(&database, &smtp, &translator);
	let response = HealthResponse {
		status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		database,
		smtp,
		translator,
	};

	let http_status = match status {
		HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};
	(http_status, Json(response))
}

async fn check_database(state: &AppState) -> ComponentStatus {
	match escalate_server_db::check_health(&state.pool).await {
		Ok(()) => ComponentStatus::healthy(),
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			ComponentStatus::with_message(HealthStatus::Unhealthy, e.to_string())
		}
	}
}

async fn check_smtp(state: &AppState) -> ComponentStatus {
	if !state.mailer.is_configured() {
		return ComponentStatus::with_message(HealthStatus::Degraded, "not configured");
	}
	if state.mailer.verify_connection().await {
		ComponentStatus::healthy()
	} else {
		ComponentStatus::with_message(HealthStatus::Degraded, "connection check failed")
	}
}
