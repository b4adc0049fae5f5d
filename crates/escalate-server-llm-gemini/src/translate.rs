// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Natural-language prompt to filter configuration.
//!
//! The model's output is untrusted. It is unwrapped from any code fence,
//! structurally checked, and then passed through the same validation gate
//! as user-authored configurations. Nothing that fails the gate is returned.

use std::collections::HashSet;
use std::sync::Arc;

use escalate_common_core::{validate_groups, FilterConfiguration, RawFilterGroup};
use escalate_server_config::LlmConfig;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::client::{GeminiClient, TextGenerator};
use crate::error::{LlmError, Result, TranslationError};
use crate::prompt::{build_prompt, clean_response};

/// Turns a free-text request into a validated [`FilterConfiguration`].
#[derive(Clone)]
pub struct FilterTranslator {
	generator: Option<Arc<dyn TextGenerator>>,
}

impl FilterTranslator {
	pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
		Self {
			generator: Some(generator),
		}
	}

	/// A translator that refuses every request with `NotConfigured`.
	pub fn unconfigured() -> Self {
		Self { generator: None }
	}

	pub fn from_config(config: &LlmConfig) -> std::result::Result<Self, LlmError> {
		match GeminiClient::from_config(config)? {
			Some(client) => {
				info!(model = client.model(), "filter translation enabled");
				Ok(Self::new(Arc::new(client)))
			}
			None => {
				info!("filter translation disabled: no Gemini API key");
				Ok(Self::unconfigured())
			}
		}
	}

	pub fn is_configured(&self) -> bool {
		self.generator.is_some()
	}

	#[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
	pub async fn translate(&self, prompt: &str) -> Result<FilterConfiguration> {
		let query = prompt.trim();
		if query.is_empty() {
			return Err(TranslationError::EmptyPrompt);
		}
		let generator = self
			.generator
			.as_ref()
			.ok_or(TranslationError::NotConfigured)?;

		let text = generator.generate(&build_prompt(query)).await?;
		debug!(response_len = text.len(), "model responded");

		let config = parse_filters(&text).inspect_err(|e| {
			warn!(error = %e, "model output rejected");
		})?;
		info!(groups = config.len(), "translated prompt into filters");
		Ok(config)
	}
}

impl std::fmt::Debug for FilterTranslator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FilterTranslator")
			.field("configured", &self.is_configured())
			.finish()
	}
}

/// Parses model output of the form `{"filters": [...]}`.
pub fn parse_filters(text: &str) -> Result<FilterConfiguration> {
	let value: Value = serde_json::from_str(clean_response(text))
		.map_err(|e| TranslationError::Unparseable(e.to_string()))?;

	let filters = value
		.get("filters")
		.and_then(Value::as_array)
		.ok_or_else(|| TranslationError::InvalidFormat("missing filters array".to_string()))?;

	for group in filters {
		let well_formed = group
			.as_object()
			.and_then(|g| g.get("conditions"))
			.is_some_and(Value::is_array);
		if !well_formed {
			return Err(TranslationError::InvalidFormat(
				"Invalid filter group structure".to_string(),
			));
		}
	}

	let mut groups: Vec<RawFilterGroup> = serde_json::from_value(Value::Array(filters.clone()))
		.map_err(|e| TranslationError::InvalidFormat(e.to_string()))?;
	assign_group_ids(&mut groups);

	Ok(validate_groups(&groups)?)
}

/// Replaces missing or repeated group ids with `group-N`.
fn assign_group_ids(groups: &mut [RawFilterGroup]) {
	let mut seen = HashSet::new();
	for (index, group) in groups.iter_mut().enumerate() {
		let id = match group.id_text() {
			Some(id) if !seen.contains(&id) => id,
			_ => {
				let mut n = index + 1;
				while seen.contains(&format!("group-{n}")) {
					n += 1;
				}
				format!("group-{n}")
			}
		};
		seen.insert(id.clone());
		group.id = Some(Value::String(id));
	}
}
