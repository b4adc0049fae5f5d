// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The filtered view over stored records.
//!
//! [`DatasetProvider`] reads the full record set and the stored filter
//! configuration, applies the configuration, and caches the result. Each
//! cached view carries the notifier version it was read at. A view older
//! than the notifier's current version is rebuilt before it is served, and
//! a rebuild that finishes after a newer one is discarded. A failed rebuild
//! leaves the previous view in place and reports
//! [`DatasetError::DataUnavailable`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use escalate_common_core::{apply_filters, EscalationRecord, FilterConfiguration};
use escalate_server_db::{ChangeEvent, ChangeNotifier, FilterConfigStore, RecordStore};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
	#[error("Records are unavailable: {0}")]
	DataUnavailable(String),
}

/// One computed view. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView {
	/// Records passing the applied configuration, in storage order.
	pub records: Vec<EscalationRecord>,
	pub total_count: usize,
	pub filtered_count: usize,
	/// `None` while no configuration is stored; every record is shown then.
	pub applied_config: Option<FilterConfiguration>,
	pub computed_at: DateTime<Utc>,
}

impl DatasetView {
	/// Applies `config` to `records`.
	pub fn compute(records: Vec<EscalationRecord>, config: Option<FilterConfiguration>) -> Self {
		let total_count = records.len();
		let records = match &config {
			Some(config) => apply_filters(&records, config).into_iter().cloned().collect(),
			None => records,
		};
		Self {
			filtered_count: records.len(),
			records,
			total_count,
			applied_config: config,
			computed_at: Utc::now(),
		}
	}
}

pub struct DatasetProvider {
	records: Arc<dyn RecordStore>,
	filters: Arc<dyn FilterConfigStore>,
	notifier: ChangeNotifier,
	view: RwLock<Option<VersionedView>>,
}

/// A cached view and the notifier version its reads started at.
struct VersionedView {
	version: u64,
	view: Arc<DatasetView>,
}

impl DatasetProvider {
	pub fn new(
		records: Arc<dyn RecordStore>,
		filters: Arc<dyn FilterConfigStore>,
		notifier: ChangeNotifier,
	) -> Self {
		Self {
			records,
			filters,
			notifier,
			view: RwLock::new(None),
		}
	}

	/// The last successfully computed view, however old.
	pub async fn current(&self) -> Option<Arc<DatasetView>> {
		self.view.read().await.as_ref().map(|cached| Arc::clone(&cached.view))
	}

	/// Re-reads the store and rebuilds the view.
	///
	/// If another rebuild that started later has already been stored, this
	/// result is dropped and the newer view is returned instead.
	///
	/// # Errors
	/// Returns `DataUnavailable` if either read fails. The cached view is
	/// left untouched in that case.
	#[instrument(skip(self))]
	pub async fn refresh(&self) -> Result<Arc<DatasetView>, DatasetError> {
		let version = self.notifier.version();
		let records = self.records.get_all_records().await.map_err(|e| {
			warn!(error = %e, "record read failed, keeping previous view");
			DatasetError::DataUnavailable(e.to_string())
		})?;
		let config = self.filters.load().await.map_err(|e| {
			warn!(error = %e, "filter read failed, keeping previous view");
			DatasetError::DataUnavailable(e.to_string())
		})?;

		let view = Arc::new(DatasetView::compute(records, config.map(|c| c.config)));
		Ok(self.store(version, view).await)
	}

	async fn store(&self, version: u64, view: Arc<DatasetView>) -> Arc<DatasetView> {
		let mut slot = self.view.write().await;
		if let Some(cached) = slot.as_ref() {
			if cached.version > version {
				debug!(
					stale = version,
					cached = cached.version,
					"discarding superseded dataset view"
				);
				return Arc::clone(&cached.view);
			}
		}
		debug!(
			version,
			total = view.total_count,
			filtered = view.filtered_count,
			"dataset view rebuilt"
		);
		*slot = Some(VersionedView {
			version,
			view: Arc::clone(&view),
		});
		view
	}

	/// Returns the cached view when no change has been published since it
	/// was read, and rebuilds it otherwise.
	pub async fn view(&self) -> Result<Arc<DatasetView>, DatasetError> {
		let latest = self.notifier.version();
		if let Some(cached) = self.view.read().await.as_ref() {
			if cached.version >= latest {
				return Ok(Arc::clone(&cached.view));
			}
		}
		self.refresh().await
	}

	/// Rebuilds the view on every change notification until the channel
	/// closes. A lagged receiver triggers one rebuild for all missed events.
	pub fn spawn_sync(self: Arc<Self>) -> JoinHandle<()> {
		let mut receiver = self.notifier.subscribe();
		tokio::spawn(async move {
			loop {
				match receiver.recv().await {
					Ok(event) => {
						debug!(event_type = event.event_type(), "resyncing dataset view");
						self.resync(&event).await;
					}
					Err(broadcast::error::RecvError::Lagged(missed)) => {
						warn!(missed, "dataset sync lagged, rebuilding once");
						let _ = self.refresh().await;
					}
					Err(broadcast::error::RecvError::Closed) => {
						info!("change channel closed, dataset sync stopped");
						break;
					}
				}
			}
		})
	}

	async fn resync(&self, event: &ChangeEvent) {
		if let Err(e) = self.refresh().await {
			warn!(event_type = event.event_type(), error = %e, "resync failed");
		}
	}
}
