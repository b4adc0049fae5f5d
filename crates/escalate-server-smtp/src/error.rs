// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use escalate_common_http::RetryableError;

/// Errors that can occur during SMTP operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmtpError {
	/// Could not reach or talk to the server. Worth retrying.
	#[error("connection failed: {0}")]
	Connection(String),

	#[error("authentication failed: {0}")]
	Auth(String),

	/// The server refused the message permanently (5xx), e.g. an unknown
	/// recipient.
	#[error("rejected by server ({code}): {message}")]
	Rejected { code: String, message: String },

	/// The server refused the message for now (4xx) or the exchange timed out.
	#[error("send failed: {0}")]
	Send(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid email address: {0}")]
	Address(String),
}

impl RetryableError for SmtpError {
	fn is_retryable(&self) -> bool {
		matches!(self, SmtpError::Connection(_) | SmtpError::Send(_))
	}
}

impl From<lettre::transport::smtp::Error> for SmtpError {
	fn from(e: lettre::transport::smtp::Error) -> Self {
		let code = e.status().map(|c| c.to_string());
		match code {
			Some(code) if e.is_permanent() && is_auth_code(&code) => SmtpError::Auth(e.to_string()),
			Some(code) if e.is_permanent() => SmtpError::Rejected {
				code,
				message: e.to_string(),
			},
			_ if e.is_transient() || e.is_timeout() => SmtpError::Send(e.to_string()),
			_ => SmtpError::Connection(e.to_string()),
		}
	}
}

/// 530, 534 and 535 are the authentication failures of RFC 4954.
fn is_auth_code(code: &str) -> bool {
	matches!(code, "530" | "534" | "535")
}

/// Why a send did not happen.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
	#[error("Email service not configured")]
	NotConfigured,

	#[error("delivery failed after {attempts} attempt(s): {source}")]
	Delivery { attempts: u32, source: SmtpError },
}

impl MailError {
	/// The last underlying cause, as shown to callers.
	pub fn cause(&self) -> String {
		match self {
			MailError::NotConfigured => self.to_string(),
			MailError::Delivery { source, .. } => source.to_string(),
		}
	}
}
