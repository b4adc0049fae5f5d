// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP delivery for escalation emails.
//!
//! [`Mailer`] is what the server talks to. It wraps any [`MailTransport`]
//! (normally [`SmtpClient`], built on [`lettre`]) with the mail retry
//! policy and classifies failures so that authentication problems and
//! rejected recipients are reported at once instead of retried.
//!
//! # Example
//!
//! ```no_run
//! use escalate_server_smtp::{MailRequest, Mailer};
//!
//! # async fn example(config: escalate_server_config::SmtpConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let mailer = Mailer::from_config(Some(&config))?;
//! let receipt = mailer
//! 	.send(&MailRequest {
//! 		to: "authority@example.gov".to_string(),
//! 		subject: "Escalation Required".to_string(),
//! 		body: "Please review.".to_string(),
//! 	})
//! 	.await?;
//! println!("sent {}", receipt.message_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod mailer;
pub mod testing;

pub use client::{is_valid_mailbox, MailTransport, OutgoingMail, SmtpClient};
pub use error::{MailError, SmtpError};
pub use mailer::{render_html, MailRequest, Mailer, SendReceipt};
