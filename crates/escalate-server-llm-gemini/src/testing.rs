// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A canned text generator for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::TextGenerator;
use crate::error::LlmError;

/// Answers every prompt with the same result and records what it was asked.
pub struct StaticGenerator {
	reply: Result<String, LlmError>,
	prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
	pub fn text(reply: impl Into<String>) -> Self {
		Self {
			reply: Ok(reply.into()),
			prompts: Mutex::new(Vec::new()),
		}
	}

	pub fn failing(error: LlmError) -> Self {
		Self {
			reply: Err(error),
			prompts: Mutex::new(Vec::new()),
		}
	}

	pub fn prompts(&self) -> Vec<String> {
		self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
	}
}

#[async_trait]
impl TextGenerator for StaticGenerator {
	async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
		if let Ok(mut prompts) = self.prompts.lock() {
			prompts.push(prompt.to_string());
		}
		self.reply.clone()
	}
}
