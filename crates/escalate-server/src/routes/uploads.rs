// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Spreadsheet upload HTTP handlers.

use axum::{
	extract::{multipart::MultipartError, Multipart, State},
	http::StatusCode,
	Json,
};
use escalate_server_api::{ErrorResponse, ParseSheetResponse, UploadResponse};
use escalate_server_sheet::{parse_buffer, ParsedSheet, SheetFormat};
use tracing::{info, instrument};

use crate::api::AppState;
use crate::error::{Result, ServerError};

const FILE_FIELD: &str = "file";

/// A file taken from a multipart form.
struct UploadedFile {
	filename: String,
	format: SheetFormat,
	bytes: Vec<u8>,
}

#[utoipa::path(
	post,
	path = "/api/parse-excel",
	request_body(content_type = "multipart/form-data", description = "Spreadsheet in the `file` field"),
	responses(
		(status = 200, description = "Parsed pending rows", body = ParseSheetResponse),
		(status = 400, description = "Missing file, wrong type or invalid rows", body = ErrorResponse),
		(status = 413, description = "File too large", body = ErrorResponse),
		(status = 500, description = "File could not be read", body = ErrorResponse)
	),
	tag = "uploads"
)]
/// POST /api/parse-excel - parse and return pending rows without storing.
#[instrument(skip(state, multipart))]
pub async fn parse_sheet(
	State(state): State<AppState>,
	multipart: Multipart,
) -> Result<Json<ParseSheetResponse>> {
	let file = read_file(&state, multipart).await?;
	let filename = file.filename.clone();
	let parsed = parse_off_thread(file).await?;

	let total_rows = parsed.total_rows();
	let pending = parsed.into_pending();
	info!(%filename, total_rows, pending = pending.len(), "spreadsheet parsed");

	Ok(Json(ParseSheetResponse {
		upload_id: uuid::Uuid::new_v4().to_string(),
		filename,
		total_rows,
		pending_count: pending.len(),
		pending,
	}))
}

#[utoipa::path(
	post,
	path = "/api/uploads",
	request_body(content_type = "multipart/form-data", description = "Spreadsheet in the `file` field"),
	responses(
		(status = 200, description = "Pending rows stored, replacing the previous upload", body = UploadResponse),
		(status = 400, description = "Missing file, wrong type or invalid rows", body = ErrorResponse),
		(status = 413, description = "File too large", body = ErrorResponse),
		(status = 500, description = "File could not be read or stored", body = ErrorResponse)
	),
	tag = "uploads"
)]
/// POST /api/uploads - parse, keep pending rows, replace the stored upload.
#[instrument(skip(state, multipart))]
pub async fn upload_sheet(
	State(state): State<AppState>,
	multipart: Multipart,
) -> Result<Json<UploadResponse>> {
	let file = read_file(&state, multipart).await?;
	let filename = file.filename.clone();
	let parsed = parse_off_thread(file).await?;

	let total_rows = parsed.total_rows();
	let pending = parsed.into_pending();
	let upload = state.records.replace_upload(&filename, &pending).await?;
	info!(
		upload_id = upload.id,
		%filename,
		total_rows,
		stored = pending.len(),
		"upload stored"
	);

	Ok(Json(UploadResponse {
		upload_id: upload.id,
		filename: upload.filename,
		total_rows,
		pending_count: pending.len(),
		pending,
	}))
}

/// Reads the `file` field and checks its type and size.
async fn read_file(state: &AppState, mut multipart: Multipart) -> Result<UploadedFile> {
	while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(state, e))? {
		if field.name() != Some(FILE_FIELD) {
			continue;
		}
		let filename = field.file_name().unwrap_or("upload").to_string();
		let content_type = field.content_type().unwrap_or_default().to_string();
		let format = SheetFormat::from_content_type(&content_type).map_err(|_| {
			ServerError::BadRequest(
				"Invalid file type. Please upload an Excel (.xlsx, .xls) or CSV file.".to_string(),
			)
		})?;

		let bytes = field.bytes().await.map_err(|e| multipart_error(state, e))?;
		if bytes.len() > state.max_upload_bytes() {
			return Err(too_large(state));
		}
		return Ok(UploadedFile {
			filename,
			format,
			bytes: bytes.to_vec(),
		});
	}
	Err(ServerError::BadRequest("No file provided".to_string()))
}

async fn parse_off_thread(file: UploadedFile) -> Result<ParsedSheet> {
	let UploadedFile { format, bytes, .. } = file;
	let parsed = tokio::task::spawn_blocking(move || parse_buffer(&bytes, format))
		.await
		.map_err(|e| ServerError::Internal(format!("parser task failed: {e}")))??;
	Ok(parsed)
}

fn multipart_error(state: &AppState, e: MultipartError) -> ServerError {
	if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
		too_large(state)
	} else {
		ServerError::BadRequest(e.body_text())
	}
}

fn too_large(state: &AppState) -> ServerError {
	ServerError::PayloadTooLarge(format!(
		"File too large. Maximum size is {}MB.",
		state.max_upload_size_mb
	))
}
