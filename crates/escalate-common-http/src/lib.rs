// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction and retry helpers shared by Escalate's outbound
//! integrations.

pub mod retry;

pub use retry::{is_retryable_status, retry, RetryError, RetryPolicy, RetryableError};

use std::time::Duration;

/// User agent sent on every outbound request.
pub const USER_AGENT: &str = concat!("escalate/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds a client with the Escalate user agent and a request timeout.
pub fn new_client_with_timeout(timeout: Duration) -> reqwest::Result<reqwest::Client> {
	reqwest::Client::builder()
		.user_agent(USER_AGENT)
		.timeout(timeout)
		.build()
}

pub fn new_client() -> reqwest::Result<reqwest::Client> {
	new_client_with_timeout(DEFAULT_TIMEOUT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_carries_version() {
		assert!(USER_AGENT.starts_with("escalate/"));
		assert!(USER_AGENT.len() > "escalate/".len());
	}

	#[test]
	fn client_builds() {
		assert!(new_client().is_ok());
	}
}
