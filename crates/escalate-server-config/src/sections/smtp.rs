// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound mail (SMTP) configuration.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::secret::SecretString;

const DEFAULT_PORT: u16 = 587;
const DEFAULT_FROM_NAME: &str = "Escalate";

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
	/// Plain text connection.
	None,
	/// Upgrade with STARTTLS after connecting.
	#[default]
	StartTls,
	/// TLS from the first byte (usually port 465).
	Tls,
}

impl TlsMode {
	pub fn parse(value: &str) -> Result<Self, ConfigError> {
		match value.trim().to_lowercase().as_str() {
			"tls" | "true" => Ok(TlsMode::Tls),
			"starttls" => Ok(TlsMode::StartTls),
			"none" | "false" => Ok(TlsMode::None),
			_ => Err(ConfigError::InvalidValue {
				key: "smtp.tls_mode".to_string(),
				message: format!("'{value}', expected one of: tls, starttls, none"),
			}),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub from_address: Option<String>,
	#[serde(default)]
	pub from_name: Option<String>,
	#[serde(default)]
	pub tls_mode: Option<TlsMode>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: SmtpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
		if other.tls_mode.is_some() {
			self.tls_mode = other.tls_mode;
		}
	}

	/// Builds the runtime config. `Ok(None)` means mail is not configured.
	pub fn build(self) -> Result<Option<SmtpConfig>, ConfigError> {
		let Some(host) = self.host.filter(|h| !h.trim().is_empty()) else {
			return Ok(None);
		};

		let from_address = self
			.from_address
			.filter(|a| !a.trim().is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"smtp.from_address is required when smtp.host is set".to_string(),
				)
			})?;

		Ok(Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(DEFAULT_PORT),
			username: self.username.filter(|u| !u.is_empty()),
			password: self.password.filter(|p| !p.is_empty()),
			from_address,
			from_name: self
				.from_name
				.unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
			tls_mode: self.tls_mode.unwrap_or_default(),
		}))
	}
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub tls_mode: TlsMode,
}
