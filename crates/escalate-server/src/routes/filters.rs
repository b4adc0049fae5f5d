// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filter configuration HTTP handlers.
//!
//! Every configuration coming in over HTTP, typed by a user or produced by
//! the translator, goes through `validate_groups` before it is stored or
//! evaluated.

use axum::{extract::State, Json};
use escalate_common_core::{apply_filters, validate_groups};
use escalate_server_api::{
	ErrorResponse, FilterMatchResponse, FilterStateResponse, FiltersRequest,
	GenerateFiltersRequest, GenerateFiltersResponse,
};
use escalate_server_db::StoredFilterConfig;
use tracing::{info, instrument};

use crate::api::AppState;
use crate::error::Result;

#[utoipa::path(
	post,
	path = "/api/generate-filters",
	request_body = GenerateFiltersRequest,
	responses(
		(status = 200, description = "Validated filter configuration", body = GenerateFiltersResponse),
		(status = 400, description = "Prompt is empty", body = ErrorResponse),
		(status = 500, description = "Translator unavailable or produced invalid output", body = ErrorResponse)
	),
	tag = "filters"
)]
/// POST /api/generate-filters - translate plain language into filters.
///
/// The result is returned for review; nothing is saved.
#[instrument(skip(state, request))]
pub async fn generate_filters(
	State(state): State<AppState>,
	Json(request): Json<GenerateFiltersRequest>,
) -> Result<Json<GenerateFiltersResponse>> {
	let filters = state.translator.translate(&request.prompt).await?;
	Ok(Json(GenerateFiltersResponse { filters }))
}

#[utoipa::path(
	get,
	path = "/api/filters",
	responses(
		(status = 200, description = "Stored configuration, or null filters when unset", body = FilterStateResponse)
	),
	tag = "filters"
)]
/// GET /api/filters
pub async fn get_filters(State(state): State<AppState>) -> Result<Json<FilterStateResponse>> {
	let response = match state.filters.load().await? {
		Some(stored) => FilterStateResponse {
			filters: Some(stored.config),
			updated_at: Some(stored.updated_at),
		},
		None => FilterStateResponse::unset(),
	};
	Ok(Json(response))
}

#[utoipa::path(
	put,
	path = "/api/filters",
	request_body = FiltersRequest,
	responses(
		(status = 200, description = "Configuration saved", body = FilterMatchResponse),
		(status = 400, description = "Configuration failed validation", body = ErrorResponse)
	),
	tag = "filters"
)]
/// PUT /api/filters - validate and apply a configuration.
#[instrument(skip(state, request), fields(groups = request.filters.len()))]
pub async fn save_filters(
	State(state): State<AppState>,
	Json(request): Json<FiltersRequest>,
) -> Result<Json<FilterMatchResponse>> {
	let config = validate_groups(&request.filters)?;
	let stored = state.filters.save(&config).await?;
	info!(groups = stored.config.len(), "filters applied");
	applied(&state, stored).await
}

#[utoipa::path(
	post,
	path = "/api/filters/preview",
	request_body = FiltersRequest,
	responses(
		(status = 200, description = "Match count for the candidate configuration", body = FilterMatchResponse),
		(status = 400, description = "Configuration failed validation", body = ErrorResponse)
	),
	tag = "filters"
)]
/// POST /api/filters/preview - count matches without saving.
pub async fn preview_filters(
	State(state): State<AppState>,
	Json(request): Json<FiltersRequest>,
) -> Result<Json<FilterMatchResponse>> {
	let config = validate_groups(&request.filters)?;
	let records = state.records.get_all_records().await?;
	let matching_count = apply_filters(&records, &config).len();
	Ok(Json(FilterMatchResponse {
		filters: config,
		matching_count,
		total_count: records.len(),
		updated_at: None,
	}))
}

#[utoipa::path(
	post,
	path = "/api/filters/reset",
	responses(
		(status = 200, description = "Default configuration stored", body = FilterMatchResponse)
	),
	tag = "filters"
)]
/// POST /api/filters/reset - store the default configuration.
pub async fn reset_filters(State(state): State<AppState>) -> Result<Json<FilterMatchResponse>> {
	let stored = state.filters.reset().await?;
	applied(&state, stored).await
}

#[utoipa::path(
	delete,
	path = "/api/filters",
	responses(
		(status = 200, description = "Configuration removed", body = FilterStateResponse)
	),
	tag = "filters"
)]
/// DELETE /api/filters - remove the configuration entirely.
pub async fn clear_filters(State(state): State<AppState>) -> Result<Json<FilterStateResponse>> {
	state.filters.clear().await?;
	state.dataset.refresh().await?;
	Ok(Json(FilterStateResponse::unset()))
}

async fn applied(state: &AppState, stored: StoredFilterConfig) -> Result<Json<FilterMatchResponse>> {
	let view = state.dataset.refresh().await?;
	Ok(Json(FilterMatchResponse {
		filters: stored.config,
		matching_count: view.filtered_count,
		total_count: view.total_count,
		updated_at: Some(stored.updated_at),
	}))
}
