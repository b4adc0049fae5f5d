// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filter configuration store.
//!
//! The configuration lives in a single row. No row means the store is
//! unset; `save` and `reset` move it to set, `clear` moves it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use escalate_common_core::{validate_configuration, validate_groups, FilterConfiguration, RawFilterGroup};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;

use crate::error::Result;
use crate::notify::{ChangeEvent, ChangeNotifier};
use crate::records::parse_timestamp;

/// A persisted configuration and the time it was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFilterConfig {
	pub config: FilterConfiguration,
	pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FilterConfigRepository {
	pool: SqlitePool,
	notifier: ChangeNotifier,
}

impl FilterConfigRepository {
	pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
		Self { pool, notifier }
	}

	/// Reads the stored configuration.
	///
	/// A row that no longer parses or no longer passes validation is
	/// logged and reported as unset.
	#[tracing::instrument(skip(self))]
	pub async fn load(&self) -> Result<Option<StoredFilterConfig>> {
		let row: Option<(String, String)> =
			sqlx::query_as("SELECT groups, updated_at FROM filter_config WHERE id = 1")
				.fetch_optional(&self.pool)
				.await?;
		let Some((groups, updated_at)) = row else {
			return Ok(None);
		};

		let raw: Vec<RawFilterGroup> = match serde_json::from_str(&groups) {
			Ok(raw) => raw,
			Err(e) => {
				tracing::warn!(error = %e, "stored filter configuration is not valid JSON, ignoring");
				return Ok(None);
			}
		};
		let config = match validate_groups(&raw) {
			Ok(config) => config,
			Err(e) => {
				tracing::warn!(error = %e, "stored filter configuration failed validation, ignoring");
				return Ok(None);
			}
		};

		Ok(Some(StoredFilterConfig {
			config,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		}))
	}

	/// Validates and overwrites the configuration, then notifies.
	///
	/// # Errors
	/// Returns `DbError::Validation` without writing if any condition
	/// breaks the column registry rules.
	#[tracing::instrument(skip(self, config), fields(groups = config.len()))]
	pub async fn save(&self, config: &FilterConfiguration) -> Result<StoredFilterConfig> {
		validate_configuration(config)?;
		let groups = serde_json::to_string(config)?;
		let updated_at = Utc::now();

		sqlx::query(
			r#"
			INSERT INTO filter_config (id, groups, updated_at)
			VALUES (1, ?1, ?2)
			ON CONFLICT(id) DO UPDATE SET groups = excluded.groups, updated_at = excluded.updated_at
			"#,
		)
		.bind(&groups)
		.bind(updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::info!("filter configuration saved");
		self.notifier.publish(ChangeEvent::filters_updated(updated_at));
		Ok(StoredFilterConfig {
			config: config.clone(),
			updated_at,
		})
	}

	/// Saves the default configuration.
	#[tracing::instrument(skip(self))]
	pub async fn reset(&self) -> Result<StoredFilterConfig> {
		self.save(&FilterConfiguration::default_config()).await
	}

	/// Deletes the configuration; `load` returns `None` afterwards.
	#[tracing::instrument(skip(self))]
	pub async fn clear(&self) -> Result<()> {
		sqlx::query("DELETE FROM filter_config")
			.execute(&self.pool)
			.await?;
		tracing::info!("filter configuration cleared");
		self.notifier.publish(ChangeEvent::filters_cleared());
		Ok(())
	}
}

#[async_trait]
pub trait FilterConfigStore: Send + Sync {
	async fn load(&self) -> Result<Option<StoredFilterConfig>>;
	async fn save(&self, config: &FilterConfiguration) -> Result<StoredFilterConfig>;
	async fn reset(&self) -> Result<StoredFilterConfig>;
	async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl FilterConfigStore for FilterConfigRepository {
	async fn load(&self) -> Result<Option<StoredFilterConfig>> {
		self.load().await
	}

	async fn save(&self, config: &FilterConfiguration) -> Result<StoredFilterConfig> {
		self.save(config).await
	}

	async fn reset(&self) -> Result<StoredFilterConfig> {
		self.reset().await
	}

	async fn clear(&self) -> Result<()> {
		self.clear().await
	}
}
