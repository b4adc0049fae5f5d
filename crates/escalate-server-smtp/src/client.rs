// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use escalate_server_config::{SmtpConfig, TlsMode};
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::error::SmtpError;

/// A fully rendered message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
	pub to: String,
	pub subject: String,
	pub text: String,
	pub html: String,
	pub message_id: String,
}

/// Anything that can put an [`OutgoingMail`] on the wire.
#[async_trait]
pub trait MailTransport: Send + Sync {
	async fn deliver(&self, mail: &OutgoingMail) -> Result<(), SmtpError>;

	async fn check_health(&self) -> Result<(), SmtpError>;
}

/// Async SMTP client backed by [`lettre`].
///
/// The connection is made lazily on the first send.
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the from address is invalid.
	/// Returns [`SmtpError::Connection`] if the transport cannot be built.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, tls_mode = ?config.tls_mode)
	)]
	pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = match config.tls_mode {
			TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?,
			TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?,
			TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (&config.username, &config.password) {
			let credentials = Credentials::new(username.clone(), password.expose().to_string());
			builder = builder.credentials(credentials);
		}

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport: builder.build(),
			from_mailbox,
		})
	}

	/// The domain of the sender address, used for message ids.
	pub fn from_domain(&self) -> &str {
		self.from_mailbox.email.domain()
	}

	fn build_message(&self, mail: &OutgoingMail) -> Result<Message, SmtpError> {
		let to_mailbox: Mailbox = mail
			.to
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		Message::builder()
			.from(self.from_mailbox.clone())
			.to(to_mailbox)
			.subject(mail.subject.as_str())
			.message_id(Some(mail.message_id.clone()))
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(mail.text.clone()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(mail.html.clone()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
	}
}

#[async_trait]
impl MailTransport for SmtpClient {
	#[tracing::instrument(
		name = "smtp_send_email",
		skip(self, mail),
		fields(to = %mail.to, message_id = %mail.message_id)
	)]
	async fn deliver(&self, mail: &OutgoingMail) -> Result<(), SmtpError> {
		let message = self.build_message(mail)?;
		tracing::debug!("sending email");
		self.transport.send(message).await?;
		tracing::info!("email sent successfully");
		Ok(())
	}

	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	async fn check_health(&self) -> Result<(), SmtpError> {
		let reachable = self.transport.test_connection().await?;
		if reachable {
			Ok(())
		} else {
			Err(SmtpError::Connection("server did not accept a connection".to_string()))
		}
	}
}

/// Whether lettre accepts `email` as a mailbox.
pub fn is_valid_mailbox(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}
