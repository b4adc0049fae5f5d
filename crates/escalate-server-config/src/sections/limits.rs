// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upload size and send-mail rate limits.

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 10;
const DEFAULT_SENDS_PER_MINUTE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConfig {
	pub max_upload_size_mb: u64,
}

impl UploadConfig {
	pub fn max_upload_bytes(&self) -> usize {
		usize::try_from(self.max_upload_size_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
	}
}

impl Default for UploadConfig {
	fn default() -> Self {
		UploadConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadConfigLayer {
	#[serde(default)]
	pub max_upload_size_mb: Option<u64>,
}

impl UploadConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_upload_size_mb.is_some() {
			self.max_upload_size_mb = other.max_upload_size_mb;
		}
	}

	pub fn finalize(self) -> UploadConfig {
		UploadConfig {
			max_upload_size_mb: self.max_upload_size_mb.unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB),
		}
	}
}

/// Fixed-window limit on send-mail requests per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
	pub per_minute: u32,
	pub window: Duration,
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		RateLimitConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimitConfigLayer {
	#[serde(default)]
	pub per_minute: Option<u32>,
}

impl RateLimitConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.per_minute.is_some() {
			self.per_minute = other.per_minute;
		}
	}

	pub fn finalize(self) -> RateLimitConfig {
		RateLimitConfig {
			per_minute: self.per_minute.unwrap_or(DEFAULT_SENDS_PER_MINUTE),
			window: Duration::from_secs(60),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn upload_default_is_ten_megabytes() {
		assert_eq!(UploadConfig::default().max_upload_bytes(), 10 * 1024 * 1024);
	}

	#[test]
	fn rate_limit_default() {
		let config = RateLimitConfig::default();
		assert_eq!(config.per_minute, 30);
		assert_eq!(config.window, Duration::from_secs(60));
	}
}
