// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Fields are optional on the wire so that missing ones are reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct SendMailRequest {
	pub record_id: Option<i64>,
	pub to: Option<String>,
	pub subject: Option<String>,
	pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SendMailResponse {
	pub success: bool,
	pub record_id: i64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl SendMailResponse {
	pub fn sent(record_id: i64, message_id: String) -> Self {
		Self {
			success: true,
			record_id,
			message_id: Some(message_id),
			error: None,
		}
	}

	pub fn failed(record_id: i64, error: impl Into<String>) -> Self {
		Self {
			success: false,
			record_id,
			message_id: None,
			error: Some(error.into()),
		}
	}
}
