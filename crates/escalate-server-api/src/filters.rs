// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use escalate_common_core::{FilterConfiguration, RawFilterGroup};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GenerateFiltersRequest {
	#[serde(default)]
	pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GenerateFiltersResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub filters: FilterConfiguration,
}

/// A configuration submitted for saving or previewing.
///
/// Groups arrive unchecked and pass through the validation gate before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FiltersRequest {
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub filters: Vec<RawFilterGroup>,
}

/// The stored configuration; `filters` is `null` while unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterStateResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<Object>>))]
	pub filters: Option<FilterConfiguration>,
	pub updated_at: Option<DateTime<Utc>>,
}

impl FilterStateResponse {
	pub fn unset() -> Self {
		Self {
			filters: None,
			updated_at: None,
		}
	}
}

/// How many stored records a configuration lets through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterMatchResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub filters: FilterConfiguration,
	pub matching_count: usize,
	pub total_count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<DateTime<Utc>>,
}
