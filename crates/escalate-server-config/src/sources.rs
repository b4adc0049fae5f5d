// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and the environment.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::secret::SecretString;
use crate::sections::{
	DatabaseConfigLayer, HttpConfigLayer, LlmConfigLayer, LoggingConfigLayer, RateLimitConfigLayer,
	SmtpConfigLayer, TlsMode, UploadConfigLayer,
};

/// Source precedence levels (higher overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// A TOML file. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/escalate/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variables named `ESCALATE_SERVER_<FIELD>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: env_var("ESCALATE_SERVER_HOST"),
				port: env_parse("ESCALATE_SERVER_PORT")?,
			}),
			database: Some(DatabaseConfigLayer {
				url: env_var("ESCALATE_SERVER_DATABASE_URL"),
				max_connections: env_parse("ESCALATE_SERVER_DATABASE_MAX_CONNECTIONS")?,
			}),
			smtp: Some(load_smtp_from_env()?),
			llm: Some(LlmConfigLayer {
				gemini_api_key: env_var("ESCALATE_SERVER_GEMINI_API_KEY").map(SecretString::new),
				gemini_model: env_var("ESCALATE_SERVER_GEMINI_MODEL"),
				gemini_base_url: env_var("ESCALATE_SERVER_GEMINI_BASE_URL"),
				timeout_secs: env_parse("ESCALATE_SERVER_GEMINI_TIMEOUT_SECS")?,
			}),
			upload: Some(UploadConfigLayer {
				max_upload_size_mb: env_parse("ESCALATE_SERVER_MAX_UPLOAD_SIZE_MB")?,
			}),
			rate_limit: Some(RateLimitConfigLayer {
				per_minute: env_parse("ESCALATE_SERVER_RATE_LIMIT_PER_MIN")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: env_var("ESCALATE_SERVER_LOG_LEVEL"),
			}),
		})
	}
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	let tls_mode = env_var("ESCALATE_SERVER_SMTP_TLS_MODE")
		.map(|v| TlsMode::parse(&v))
		.transpose()?;

	Ok(SmtpConfigLayer {
		host: env_var("ESCALATE_SERVER_SMTP_HOST"),
		port: env_parse("ESCALATE_SERVER_SMTP_PORT")?,
		username: env_var("ESCALATE_SERVER_SMTP_USERNAME"),
		password: env_var("ESCALATE_SERVER_SMTP_PASSWORD").map(SecretString::new),
		from_address: env_var("ESCALATE_SERVER_SMTP_FROM_ADDRESS"),
		from_name: env_var("ESCALATE_SERVER_SMTP_FROM_NAME"),
		tls_mode,
	})
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("cannot parse '{v}' as {}", std::any::type_name::<T>()),
			}),
		None => Ok(None),
	}
}
