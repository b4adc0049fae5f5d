// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Escalate server.
//!
//! Values are layered from built-in defaults, an optional TOML file and
//! `ESCALATE_SERVER_*` environment variables, in that order of precedence.
//!
//! ```ignore
//! let config = escalate_server_config::load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod secret;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use secret::{SecretString, REDACTED};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	/// `None` when outbound mail is not configured.
	pub smtp: Option<SmtpConfig>,
	pub llm: LlmConfig,
	pub upload: UploadConfig,
	pub rate_limit: RateLimitConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Loads defaults, `/etc/escalate/server.toml`, then the environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Like [`load_config`] but reads the given TOML file instead of the system one.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let smtp = layer.smtp.unwrap_or_default().build()?;
	let llm = layer.llm.unwrap_or_default().finalize();
	let upload = layer.upload.unwrap_or_default().finalize();
	let rate_limit = layer.rate_limit.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	if upload.max_upload_size_mb == 0 {
		return Err(ConfigError::Validation(
			"upload.max_upload_size_mb must be at least 1".to_string(),
		));
	}
	if rate_limit.per_minute == 0 {
		return Err(ConfigError::Validation(
			"rate_limit.per_minute must be at least 1".to_string(),
		));
	}

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		smtp_configured = smtp.is_some(),
		translator_configured = llm.is_configured(),
		max_upload_size_mb = upload.max_upload_size_mb,
		sends_per_minute = rate_limit.per_minute,
		"server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		smtp,
		llm,
		upload,
		rate_limit,
		logging,
	})
}
