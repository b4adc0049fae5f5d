// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gemini `generateContent` wire types.

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
	pub contents: Vec<GeminiContent>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiRequest {
	/// A single user turn.
	pub fn user_text(text: impl Into<String>) -> Self {
		Self {
			contents: vec![GeminiContent {
				role: Some("user".to_string()),
				parts: vec![GeminiPart {
					text: Some(text.into()),
				}],
			}],
			generation_config: None,
		}
	}

	pub fn with_generation_config(mut self, config: GeminiGenerationConfig) -> Self {
		self.generation_config = Some(config);
		self
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
	#[serde(default)]
	pub parts: Vec<GeminiPart>,
}

/// Only text parts are produced or read; other part kinds deserialize
/// with `text` unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temperature: Option<f32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_output_tokens: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
	#[serde(default)]
	pub candidates: Vec<GeminiCandidate>,
	pub usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
	pub content: Option<GeminiContent>,
	pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
	#[serde(default)]
	pub prompt_token_count: u32,
	pub candidates_token_count: Option<u32>,
	pub total_token_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiError {
	pub error: GeminiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorDetail {
	pub message: String,
	pub status: Option<String>,
	pub code: Option<i32>,
}

impl GeminiResponse {
	/// Text of the first candidate, parts concatenated.
	pub fn text(&self) -> Result<String, LlmError> {
		let candidate = self
			.candidates
			.first()
			.ok_or_else(|| LlmError::InvalidResponse("Gemini response had no candidates".to_string()))?;
		let text: String = candidate
			.content
			.iter()
			.flat_map(|c| c.parts.iter())
			.filter_map(|p| p.text.as_deref())
			.collect();
		if text.is_empty() {
			return Err(LlmError::InvalidResponse(format!(
				"Gemini candidate had no text (finish reason: {})",
				candidate.finish_reason.as_deref().unwrap_or("unknown")
			)));
		}
		Ok(text)
	}
}
