// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use escalate_common_core::{
	EmailDraft, EscalationRecord, FilterConfiguration, MailStatusFilter, RecordStats,
	SortDirection, SortField, TableQuery,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Query string of `GET /api/records`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase", default)]
pub struct RecordsParams {
	/// Case-insensitive substring over the text columns.
	pub search: Option<String>,
	/// Exact department, or `all`.
	pub department: Option<String>,
	/// `all`, `sent` or `pending`.
	#[cfg_attr(feature = "openapi", param(value_type = Option<String>))]
	pub mail_status: Option<MailStatusFilter>,
	/// `department`, `fileActivity`, `pendingSince`, `tatDays` or `escalationEmail`.
	#[cfg_attr(feature = "openapi", param(value_type = Option<String>))]
	pub sort_field: Option<SortField>,
	/// `asc` or `desc`.
	#[cfg_attr(feature = "openapi", param(value_type = Option<String>))]
	pub sort_direction: Option<SortDirection>,
	/// Re-read the store even if no change was published.
	pub refresh: Option<bool>,
}

impl From<RecordsParams> for TableQuery {
	fn from(params: RecordsParams) -> Self {
		TableQuery {
			search: params.search.filter(|s| !s.trim().is_empty()),
			department: params.department,
			mail_status: params.mail_status.unwrap_or_default(),
			sort_field: params.sort_field.unwrap_or_default(),
			sort_direction: params.sort_direction.unwrap_or_default(),
		}
	}
}

/// The filtered dataset view, narrowed further by the table query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
	#[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
	pub records: Vec<EscalationRecord>,
	/// Every stored record.
	pub total_count: usize,
	/// Records passing the applied filter configuration.
	pub filtered_count: usize,
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<Object>>))]
	pub applied_config: Option<FilterConfiguration>,
	/// Counters over the filtered records.
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub stats: RecordStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DepartmentsResponse {
	pub departments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
	pub record_id: i64,
	pub to: String,
	pub subject: String,
	pub body: String,
}

impl DraftResponse {
	pub fn new(record_id: i64, draft: EmailDraft) -> Self {
		Self {
			record_id,
			to: draft.to,
			subject: draft.subject,
			body: draft.body,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClearResponse {
	pub success: bool,
	pub cleared: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_params_use_table_defaults() {
		let query = TableQuery::from(RecordsParams::default());
		assert_eq!(query, TableQuery::default());
	}

	#[test]
	fn blank_search_is_dropped() {
		let query = TableQuery::from(RecordsParams {
			search: Some("  ".to_string()),
			..RecordsParams::default()
		});
		assert_eq!(query.search, None);
	}

	#[test]
	fn params_parse_wire_names() {
		let params: RecordsParams = serde_json::from_value(serde_json::json!({
			"mailStatus": "sent",
			"sortField": "tatDays",
			"sortDirection": "asc"
		}))
		.unwrap();
		let query = TableQuery::from(params);
		assert_eq!(query.mail_status, MailStatusFilter::Sent);
		assert_eq!(query.sort_field, SortField::TatDays);
		assert_eq!(query.sort_direction, SortDirection::Asc);
	}
}
