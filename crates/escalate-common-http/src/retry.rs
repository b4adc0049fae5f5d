// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded retry with exponential backoff.

use reqwest::StatusCode;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

const RETRYABLE_STATUSES: [StatusCode; 6] = [
	StatusCode::TOO_MANY_REQUESTS,
	StatusCode::REQUEST_TIMEOUT,
	StatusCode::INTERNAL_SERVER_ERROR,
	StatusCode::BAD_GATEWAY,
	StatusCode::SERVICE_UNAVAILABLE,
	StatusCode::GATEWAY_TIMEOUT,
];

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(500),
			max_delay: Duration::from_secs(8),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryPolicy {
	/// Mail delivery: three attempts, waiting 2s then 4s.
	pub fn mail_delivery() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_secs(2),
			max_delay: Duration::from_secs(30),
			backoff_factor: 2.0,
			jitter: false,
		}
	}

	/// No waiting between attempts. For tests.
	pub fn immediate(max_attempts: u32) -> Self {
		Self {
			max_attempts,
			base_delay: Duration::ZERO,
			max_delay: Duration::ZERO,
			backoff_factor: 1.0,
			jitter: false,
		}
	}

	/// Delay before retry number `retry` (zero based).
	pub fn delay_for(&self, retry: u32) -> Duration {
		let exponential =
			self.base_delay.as_secs_f64() * self.backoff_factor.powi(retry.min(i32::MAX as u32) as i32);
		let capped = exponential.min(self.max_delay.as_secs_f64());
		let delay = if self.jitter {
			capped * (0.5 + fastrand::f64())
		} else {
			capped
		};
		Duration::from_secs_f64(delay.max(0.0))
	}
}

/// Errors that know whether another attempt could succeed.
pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

pub fn is_retryable_status(status: StatusCode) -> bool {
	RETRYABLE_STATUSES.contains(&status)
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}
		self.status().is_some_and(is_retryable_status)
	}
}

/// The final error of a retried operation and how many attempts were made.
#[derive(Debug)]
pub struct RetryError<E> {
	pub attempts: u32,
	pub error: E,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "failed after {} attempt(s): {}", self.attempts, self.error)
	}
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.error)
	}
}

/// Runs `f` until it succeeds, fails permanently, or the policy runs out.
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, mut f: F) -> Result<T, RetryError<E>>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: RetryableError + fmt::Display,
{
	let max_attempts = policy.max_attempts.max(1);
	let mut attempt = 0;

	loop {
		attempt += 1;
		let error = match f().await {
			Ok(value) => return Ok(value),
			Err(error) => error,
		};

		if !error.is_retryable() {
			warn!(%error, attempt, "permanent failure, not retrying");
			return Err(RetryError {
				attempts: attempt,
				error,
			});
		}

		if attempt >= max_attempts {
			warn!(%error, attempt, max_attempts, "retry attempts exhausted");
			return Err(RetryError {
				attempts: attempt,
				error,
			});
		}

		let delay = policy.delay_for(attempt - 1);
		warn!(
			%error,
			attempt,
			max_attempts,
			delay_ms = delay.as_millis() as u64,
			"attempt failed, retrying"
		);
		tokio::time::sleep(delay).await;
	}
}
