// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gemini API client.

use std::time::Duration;

use async_trait::async_trait;
use escalate_common_http::{retry, RetryPolicy};
use escalate_server_config::{LlmConfig, SecretString};
use reqwest::Client;
use tracing::{debug, error, info, instrument, trace};

use crate::error::LlmError;
use crate::types::{GeminiError, GeminiGenerationConfig, GeminiRequest, GeminiResponse};

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
	async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct GeminiClient {
	api_key: SecretString,
	model: String,
	base_url: String,
	http_client: Client,
	retry_policy: RetryPolicy,
}

impl GeminiClient {
	pub fn new(
		api_key: SecretString,
		model: impl Into<String>,
		base_url: impl Into<String>,
		timeout: Duration,
	) -> Result<Self, LlmError> {
		let http_client = escalate_common_http::new_client_with_timeout(timeout)
			.map_err(|e| LlmError::Http(e.to_string()))?;
		let model = model.into();
		let base_url = base_url.into().trim_end_matches('/').to_string();

		info!(model = %model, base_url = %base_url, "Initialized Gemini client");

		Ok(Self {
			api_key,
			model,
			base_url,
			http_client,
			retry_policy: RetryPolicy::default(),
		})
	}

	/// `None` when no API key is configured.
	pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
		let Some(api_key) = config.gemini_api_key.clone() else {
			return Ok(None);
		};
		Self::new(
			api_key,
			config.gemini_model.clone(),
			config.gemini_base_url.clone(),
			Duration::from_secs(config.timeout_secs),
		)
		.map(Some)
	}

	pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
		self.retry_policy = retry_policy;
		self
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	fn endpoint(&self) -> String {
		format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
	}

	async fn handle_error_response(&self, response: reqwest::Response) -> LlmError {
		let status = response.status();
		debug!(status = %status, "Received error response from Gemini");

		if status.as_u16() == 429 {
			let retry_after = response
				.headers()
				.get("retry-after")
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.parse().ok());
			return LlmError::RateLimited {
				retry_after_secs: retry_after,
			};
		}

		match response.json::<GeminiError>().await {
			Ok(body) => {
				error!(
					status = ?body.error.status,
					code = ?body.error.code,
					message = %body.error.message,
					"Gemini API error"
				);
				LlmError::Api {
					status: status.as_u16(),
					message: body.error.message,
				}
			}
			Err(e) => {
				error!(status = %status, parse_error = %e, "Failed to parse Gemini error response");
				LlmError::Api {
					status: status.as_u16(),
					message: format!("HTTP {status}"),
				}
			}
		}
	}
}

#[async_trait]
impl TextGenerator for GeminiClient {
	#[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
	async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
		let request = GeminiRequest::user_text(prompt).with_generation_config(GeminiGenerationConfig {
			temperature: Some(0.0),
			max_output_tokens: None,
			response_mime_type: Some("application/json".to_string()),
		});
		let url = self.endpoint();

		let result = retry(&self.retry_policy, || async {
			trace!(url = %url, "Sending Gemini request");
			let response = self
				.http_client
				.post(&url)
				.header("x-goog-api-key", self.api_key.expose())
				.json(&request)
				.send()
				.await
				.map_err(|e| {
					if e.is_timeout() {
						LlmError::Timeout
					} else {
						LlmError::Http(e.to_string())
					}
				})?;

			if !response.status().is_success() {
				return Err(self.handle_error_response(response).await);
			}

			response
				.json::<GeminiResponse>()
				.await
				.map_err(|e| LlmError::InvalidResponse(e.to_string()))
		})
		.await;

		match result {
			Ok(response) => {
				if let Some(usage) = &response.usage_metadata {
					debug!(
						input_tokens = usage.prompt_token_count,
						output_tokens = usage.candidates_token_count.unwrap_or(0),
						"Gemini token usage"
					);
				}
				response.text()
			}
			Err(e) => {
				error!(attempts = e.attempts, error = %e.error, "Gemini request failed");
				Err(e.error)
			}
		}
	}
}
