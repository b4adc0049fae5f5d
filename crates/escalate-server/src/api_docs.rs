// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document for escalate-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
	info(
		title = "Escalate Server API",
		version = "1.0.0",
		description = "Escalation tracking: spreadsheet uploads, rule-based filtering of pending files, and escalation email delivery.",
		license(name = "Proprietary"),
		contact(
			name = "Geoffrey Huntley",
			email = "ghuntley@ghuntley.com",
			url = "https://ghuntley.com"
		)
	),
	servers(
		(url = "/", description = "Local server")
	),
	tags(
		(name = "health", description = "Health checks"),
		(name = "filters", description = "Filter configuration and natural-language translation"),
		(name = "records", description = "Filtered records, departments and email drafts"),
		(name = "uploads", description = "Spreadsheet parsing and storage"),
		(name = "mail", description = "Escalation email delivery"),
		(name = "events", description = "Change notifications")
	),
	paths(
		crate::routes::health::health_check,
		crate::routes::filters::generate_filters,
		crate::routes::filters::get_filters,
		crate::routes::filters::save_filters,
		crate::routes::filters::preview_filters,
		crate::routes::filters::reset_filters,
		crate::routes::filters::clear_filters,
		crate::routes::records::list_records,
		crate::routes::records::clear_records,
		crate::routes::records::clear_all_data,
		crate::routes::records::list_departments,
		crate::routes::records::get_draft,
		crate::routes::uploads::parse_sheet,
		crate::routes::uploads::upload_sheet,
		crate::routes::mail::send_mail,
		crate::routes::events::stream_events,
	),
	components(
		schemas(
			escalate_server_api::ErrorResponse,
			escalate_server_api::HealthResponse,
			escalate_server_api::HealthStatus,
			escalate_server_api::ComponentStatus,
			escalate_server_api::GenerateFiltersRequest,
			escalate_server_api::GenerateFiltersResponse,
			escalate_server_api::FiltersRequest,
			escalate_server_api::FilterStateResponse,
			escalate_server_api::FilterMatchResponse,
			escalate_server_api::RecordsResponse,
			escalate_server_api::DepartmentsResponse,
			escalate_server_api::DraftResponse,
			escalate_server_api::ClearResponse,
			escalate_server_api::ParseSheetResponse,
			escalate_server_api::UploadResponse,
			escalate_server_api::SendMailRequest,
			escalate_server_api::SendMailResponse,
		)
	)
)]
pub struct ApiDoc;
