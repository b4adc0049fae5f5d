// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use escalate_common_core::ValidationError;
use escalate_server_api::ErrorResponse;
use escalate_server_db::DbError;
use escalate_server_llm_gemini::TranslationError;
use escalate_server_sheet::SheetError;

use crate::dataset::DatasetError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("{0}")]
	Dataset(#[from] DatasetError),

	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	BadRequest(String),

	#[error("Invalid filter configuration: {0}")]
	InvalidFilters(#[from] ValidationError),

	#[error("{0}")]
	Sheet(#[from] SheetError),

	#[error("{0}")]
	Translation(#[from] TranslationError),

	#[error("{0}")]
	PayloadTooLarge(String),

	#[error("Rate limit exceeded. Please try again later.")]
	RateLimited,

	#[error("{0}")]
	Conflict(String),

	#[error("{0}")]
	ServiceUnavailable(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
	fn parts(&self) -> (StatusCode, &'static str, String) {
		match self {
			ServerError::Db(DbError::NotFound(what)) => {
				(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
			}
			ServerError::Db(DbError::Validation(e)) => (
				StatusCode::BAD_REQUEST,
				"validation_error",
				format!("Invalid filter configuration: {e}"),
			),
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"database_error",
					"A database error occurred. Please try again.".to_string(),
				)
			}
			ServerError::Dataset(e) => {
				tracing::error!(error = %e, "dataset unavailable");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"data_unavailable",
					"Records could not be loaded. Please try again.".to_string(),
				)
			}
			ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
			ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
			ServerError::InvalidFilters(_) => {
				(StatusCode::BAD_REQUEST, "validation_error", self.to_string())
			}
			ServerError::Sheet(e) if e.is_validation() => {
				(StatusCode::BAD_REQUEST, "invalid_upload", e.to_string())
			}
			ServerError::Sheet(e) => {
				tracing::warn!(error = %e, "spreadsheet could not be read");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"parse_error",
					"Failed to parse Excel file. Please check the file format and try again."
						.to_string(),
				)
			}
			ServerError::Translation(TranslationError::EmptyPrompt) => {
				(StatusCode::BAD_REQUEST, "bad_request", self.to_string())
			}
			ServerError::Translation(e) => {
				tracing::warn!(error = %e, "filter translation failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"translation_error",
					e.to_string(),
				)
			}
			ServerError::PayloadTooLarge(msg) => {
				(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone())
			}
			ServerError::RateLimited => {
				(StatusCode::TOO_MANY_REQUESTS, "rate_limited", self.to_string())
			}
			ServerError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
			ServerError::ServiceUnavailable(msg) => (
				StatusCode::SERVICE_UNAVAILABLE,
				"service_unavailable",
				msg.clone(),
			),
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"An internal error occurred".to_string(),
				)
			}
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error, message) = self.parts();
		(status, Json(ErrorResponse::new(error, message))).into_response()
	}
}
