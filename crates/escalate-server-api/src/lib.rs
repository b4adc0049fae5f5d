// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod error;
pub mod filters;
pub mod health;
pub mod mail;
pub mod records;
pub mod uploads;

pub use error::ErrorResponse;
pub use filters::{
	FilterMatchResponse, FilterStateResponse, FiltersRequest, GenerateFiltersRequest,
	GenerateFiltersResponse,
};
pub use health::{ComponentStatus, HealthResponse, HealthStatus};
pub use mail::{SendMailRequest, SendMailResponse};
pub use records::{
	ClearResponse, DepartmentsResponse, DraftResponse, RecordsParams, RecordsResponse,
};
pub use uploads::{ParseSheetResponse, UploadResponse};
