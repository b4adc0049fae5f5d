// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use escalate_common_http::{retry, RetryPolicy};
use escalate_server_config::SmtpConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{MailTransport, OutgoingMail, SmtpClient};
use crate::error::{MailError, SmtpError};

/// What the caller wants sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRequest {
	pub to: String,
	pub subject: String,
	pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
	pub message_id: String,
	pub attempts: u32,
}

/// Sends escalation emails with bounded retry.
///
/// A mailer without a transport reports itself unconfigured and refuses
/// every send.
#[derive(Clone)]
pub struct Mailer {
	transport: Option<Arc<dyn MailTransport>>,
	policy: RetryPolicy,
	id_domain: String,
}

impl Mailer {
	pub fn unconfigured() -> Self {
		Self {
			transport: None,
			policy: RetryPolicy::mail_delivery(),
			id_domain: "localhost".to_string(),
		}
	}

	pub fn new(transport: Arc<dyn MailTransport>, id_domain: impl Into<String>) -> Self {
		Self {
			transport: Some(transport),
			policy: RetryPolicy::mail_delivery(),
			id_domain: id_domain.into(),
		}
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Builds an SMTP-backed mailer, or an unconfigured one when SMTP is
	/// not set up.
	pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, SmtpError> {
		let Some(config) = config else {
			tracing::warn!("SMTP configuration incomplete, email sending is disabled");
			return Ok(Self::unconfigured());
		};
		let client = SmtpClient::new(config)?;
		let domain = client.from_domain().to_string();
		Ok(Self::new(Arc::new(client), domain))
	}

	pub fn is_configured(&self) -> bool {
		self.transport.is_some()
	}

	/// Whether the server currently accepts connections.
	pub async fn verify_connection(&self) -> bool {
		match &self.transport {
			Some(transport) => match transport.check_health().await {
				Ok(()) => true,
				Err(e) => {
					tracing::warn!(error = %e, "SMTP connection check failed");
					false
				}
			},
			None => false,
		}
	}

	/// Sends `request` as plain text plus a `<pre>`-wrapped HTML part.
	///
	/// Transient failures are retried per the policy. Authentication
	/// failures, bad addresses and permanent rejections are not.
	#[tracing::instrument(skip(self, request), fields(to = %request.to))]
	pub async fn send(&self, request: &MailRequest) -> Result<SendReceipt, MailError> {
		let transport = self.transport.as_ref().ok_or(MailError::NotConfigured)?;

		let mail = OutgoingMail {
			to: request.to.clone(),
			subject: request.subject.clone(),
			text: request.body.clone(),
			html: render_html(&request.body),
			message_id: format!("<{}@{}>", Uuid::new_v4(), self.id_domain),
		};

		let mut attempts = 0;
		let result = retry(&self.policy, || {
			attempts += 1;
			transport.deliver(&mail)
		})
		.await;

		match result {
			Ok(()) => {
				tracing::info!(message_id = %mail.message_id, attempts, "escalation email sent");
				Ok(SendReceipt {
					message_id: mail.message_id,
					attempts,
				})
			}
			Err(e) => Err(MailError::Delivery {
				attempts: e.attempts,
				source: e.error,
			}),
		}
	}
}

pub fn render_html(body: &str) -> String {
	format!("<pre>{}</pre>", escape_html(body))
}

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}
