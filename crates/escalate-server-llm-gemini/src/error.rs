// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use escalate_common_core::ValidationError;
use escalate_common_http::RetryableError;

/// Failures talking to the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
	#[error("HTTP error: {0}")]
	Http(String),

	#[error("request timed out")]
	Timeout,

	#[error("rate limited")]
	RateLimited { retry_after_secs: Option<u64> },

	#[error("API error ({status}): {message}")]
	Api { status: u16, message: String },

	#[error("invalid response: {0}")]
	InvalidResponse(String),
}

impl RetryableError for LlmError {
	fn is_retryable(&self) -> bool {
		match self {
			LlmError::Http(_) | LlmError::Timeout | LlmError::RateLimited { .. } => true,
			LlmError::Api { status, .. } => *status >= 500,
			LlmError::InvalidResponse(_) => false,
		}
	}
}

/// Why a prompt did not become a filter configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslationError {
	#[error("Prompt is required")]
	EmptyPrompt,

	#[error("Gemini API key not configured")]
	NotConfigured,

	#[error("Failed to generate filters with AI: {0}")]
	Generation(#[from] LlmError),

	#[error("Failed to parse AI response: {0}")]
	Unparseable(String),

	#[error("Invalid response format from AI: {0}")]
	InvalidFormat(String),

	#[error("AI produced an invalid filter: {0}")]
	Invalid(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, TranslationError>;
