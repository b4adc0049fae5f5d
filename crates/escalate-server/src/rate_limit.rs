// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-client request limiting for outbound mail.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Client key used when no forwarding header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct Window {
	count: u32,
	resets_at: Instant,
}

/// Fixed-window counter keyed by client address.
///
/// The first request from a client opens a window; up to `limit` requests
/// are allowed until it ends, after which the next request opens a new one.
#[derive(Debug, Clone)]
pub struct RateLimiter {
	windows: Arc<Mutex<HashMap<String, Window>>>,
	limit: u32,
	window: Duration,
}

impl RateLimiter {
	pub fn new(limit: u32, window: Duration) -> Self {
		Self {
			windows: Arc::new(Mutex::new(HashMap::new())),
			limit: limit.max(1),
			window,
		}
	}

	pub fn per_minute(limit: u32) -> Self {
		Self::new(limit, Duration::from_secs(60))
	}

	/// Counts a request from `client`; returns false once over the limit.
	pub async fn check(&self, client: &str) -> bool {
		let now = Instant::now();
		let mut windows = self.windows.lock().await;
		windows.retain(|_, w| w.resets_at > now);

		match windows.get_mut(client) {
			None => {
				windows.insert(
					client.to_string(),
					Window {
						count: 1,
						resets_at: now + self.window,
					},
				);
				true
			}
			Some(w) if w.count >= self.limit => {
				warn!(client, limit = self.limit, "rate limit exceeded");
				false
			}
			Some(w) => {
				w.count += 1;
				debug!(client, count = w.count, "rate limit check passed");
				true
			}
		}
	}
}

/// The client key for rate limiting: `x-forwarded-for` as sent, then
/// `x-real-ip`, then [`UNKNOWN_CLIENT`].
pub fn client_key(headers: &HeaderMap) -> String {
	["x-forwarded-for", "x-real-ip"]
		.iter()
		.filter_map(|name| headers.get(*name))
		.filter_map(|value| value.to_str().ok())
		.map(str::trim)
		.find(|value| !value.is_empty())
		.unwrap_or(UNKNOWN_CLIENT)
		.to_string()
}
