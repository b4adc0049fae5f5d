// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Natural-language filter translator (Gemini) configuration.

use serde::Deserialize;

use crate::secret::SecretString;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct LlmConfig {
	/// `None` leaves the translator unconfigured.
	pub gemini_api_key: Option<SecretString>,
	pub gemini_model: String,
	pub gemini_base_url: String,
	pub timeout_secs: u64,
}

impl LlmConfig {
	pub fn is_configured(&self) -> bool {
		self.gemini_api_key.is_some()
	}
}

impl Default for LlmConfig {
	fn default() -> Self {
		LlmConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfigLayer {
	#[serde(default)]
	pub gemini_api_key: Option<SecretString>,
	#[serde(default)]
	pub gemini_model: Option<String>,
	#[serde(default)]
	pub gemini_base_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl LlmConfigLayer {
	pub fn merge(&mut self, other: LlmConfigLayer) {
		if other.gemini_api_key.is_some() {
			self.gemini_api_key = other.gemini_api_key;
		}
		if other.gemini_model.is_some() {
			self.gemini_model = other.gemini_model;
		}
		if other.gemini_base_url.is_some() {
			self.gemini_base_url = other.gemini_base_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> LlmConfig {
		LlmConfig {
			gemini_api_key: self.gemini_api_key.filter(|k| !k.is_empty()),
			gemini_model: self
				.gemini_model
				.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
			gemini_base_url: self
				.gemini_base_url
				.map(|u| u.trim_end_matches('/').to_string())
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		}
	}
}
