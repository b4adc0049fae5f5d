// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use escalate_common_core::NewRecord;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Result of parsing a spreadsheet without storing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ParseSheetResponse {
	/// Identifier for this parse only; nothing is stored under it.
	pub upload_id: String,
	pub filename: String,
	pub total_rows: usize,
	pub pending_count: usize,
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub pending: Vec<NewRecord>,
}

/// Result of a stored upload. Only pending rows are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
	pub upload_id: i64,
	pub filename: String,
	pub total_rows: usize,
	pub pending_count: usize,
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub pending: Vec<NewRecord>,
}
