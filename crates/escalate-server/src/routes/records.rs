// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record listing and maintenance HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	Json,
};
use escalate_common_core::{EmailDraft, RecordStats, TableQuery};
use escalate_server_api::{
	ClearResponse, DepartmentsResponse, DraftResponse, ErrorResponse, RecordsParams,
	RecordsResponse,
};
use tracing::{info, instrument};

use crate::api::AppState;
use crate::error::{Result, ServerError};

#[utoipa::path(
	get,
	path = "/api/records",
	params(RecordsParams),
	responses(
		(status = 200, description = "Filtered records", body = RecordsResponse),
		(status = 500, description = "Records could not be loaded", body = ErrorResponse)
	),
	tag = "records"
)]
/// GET /api/records - the filtered view, narrowed by the table query.
///
/// Serves the cached view unless a change was published since it was
/// built. `refresh=true` re-reads the store regardless, which picks up
/// writes made by other processes.
pub async fn list_records(
	State(state): State<AppState>,
	Query(params): Query<RecordsParams>,
) -> Result<Json<RecordsResponse>> {
	let view = if params.refresh == Some(true) {
		state.dataset.refresh().await?
	} else {
		state.dataset.view().await?
	};
	let query = TableQuery::from(params);
	let records = query.apply(&view.records).into_iter().cloned().collect();

	Ok(Json(RecordsResponse {
		records,
		total_count: view.total_count,
		filtered_count: view.filtered_count,
		applied_config: view.applied_config.clone(),
		stats: RecordStats::from_records(&view.records),
	}))
}

#[utoipa::path(
	delete,
	path = "/api/records",
	responses(
		(status = 200, description = "Records deleted", body = ClearResponse)
	),
	tag = "records"
)]
/// DELETE /api/records - delete every record, keeping the filters.
#[instrument(skip(state))]
pub async fn clear_records(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
	let cleared = state.records.clear_records().await?;
	info!(cleared, "records cleared");
	Ok(Json(ClearResponse {
		success: true,
		cleared,
	}))
}

#[utoipa::path(
	delete,
	path = "/api/data",
	responses(
		(status = 200, description = "Records, uploads and filters deleted", body = ClearResponse)
	),
	tag = "records"
)]
/// DELETE /api/data - delete records, upload metadata and filters.
#[instrument(skip(state))]
pub async fn clear_all_data(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
	let cleared = state.records.get_all_records().await?.len() as u64;
	state.records.clear_all().await?;
	info!(cleared, "all data cleared");
	Ok(Json(ClearResponse {
		success: true,
		cleared,
	}))
}

#[utoipa::path(
	get,
	path = "/api/departments",
	responses(
		(status = 200, description = "Distinct departments, sorted", body = DepartmentsResponse)
	),
	tag = "records"
)]
/// GET /api/departments
pub async fn list_departments(State(state): State<AppState>) -> Result<Json<DepartmentsResponse>> {
	let departments = state.records.get_departments().await?;
	Ok(Json(DepartmentsResponse { departments }))
}

#[utoipa::path(
	get,
	path = "/api/records/{id}/draft",
	params(("id" = i64, Path, description = "Record id")),
	responses(
		(status = 200, description = "Pre-filled escalation email", body = DraftResponse),
		(status = 404, description = "Record not found", body = ErrorResponse)
	),
	tag = "records"
)]
/// GET /api/records/{id}/draft
pub async fn get_draft(
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Json<DraftResponse>> {
	let record = state
		.records
		.get_record(id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Record not found".to_string()))?;
	Ok(Json(DraftResponse::new(id, EmailDraft::for_record(&record))))
}
