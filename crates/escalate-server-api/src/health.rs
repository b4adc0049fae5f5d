// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
	Healthy,
	Degraded,
	Unhealthy,
}

/// State of a single dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ComponentStatus {
	pub status: HealthStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl ComponentStatus {
	pub fn healthy() -> Self {
		Self {
			status: HealthStatus::Healthy,
			message: None,
		}
	}

	pub fn with_message(status: HealthStatus, message: impl Into<String>) -> Self {
		Self {
			status,
			message: Some(message.into()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub version: String,
	pub database: ComponentStatus,
	pub smtp: ComponentStatus,
	pub translator: ComponentStatus,
}

impl HealthResponse {
	/// Database trouble is fatal; a missing optional integration only degrades.
	pub fn aggregate(
		database: &ComponentStatus,
		smtp: &ComponentStatus,
		translator: &ComponentStatus,
	) -> HealthStatus {
		if database.status == HealthStatus::Unhealthy {
			HealthStatus::Unhealthy
		} else if smtp.status != HealthStatus::Healthy || translator.status != HealthStatus::Healthy
		{
			HealthStatus::Degraded
		} else {
			HealthStatus::Healthy
		}
	}
}
