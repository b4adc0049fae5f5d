// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! An in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{MailTransport, OutgoingMail};
use crate::error::SmtpError;

/// Fails with each scripted error in turn, then succeeds and records the
/// delivered mail.
#[derive(Default)]
pub struct ScriptedTransport {
	failures: Mutex<VecDeque<SmtpError>>,
	sent: Mutex<Vec<OutgoingMail>>,
	attempts: AtomicU32,
	delay: Option<Duration>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing_with(errors: Vec<SmtpError>) -> Self {
		Self {
			failures: Mutex::new(errors.into()),
			..Self::default()
		}
	}

	/// Makes every delivery take at least `delay`.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn sent(&self) -> Vec<OutgoingMail> {
		self.sent.lock().map(|s| s.clone()).unwrap_or_default()
	}

	pub fn attempts(&self) -> u32 {
		self.attempts.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl MailTransport for ScriptedTransport {
	async fn deliver(&self, mail: &OutgoingMail) -> Result<(), SmtpError> {
		self.attempts.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		let failure = self.failures.lock().ok().and_then(|mut f| f.pop_front());
		if let Some(error) = failure {
			return Err(error);
		}
		if let Ok(mut sent) = self.sent.lock() {
			sent.push(mail.clone());
		}
		Ok(())
	}

	async fn check_health(&self) -> Result<(), SmtpError> {
		Ok(())
	}
}
