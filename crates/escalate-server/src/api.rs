// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	extract::DefaultBodyLimit,
	routing::{get, post},
	Router,
};
use escalate_server_config::ServerConfig;
use escalate_server_db::{ChangeNotifier, FilterConfigRepository, RecordRepository};
use escalate_server_llm_gemini::FilterTranslator;
use escalate_server_smtp::Mailer;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use crate::dataset::DatasetProvider;
use crate::rate_limit::RateLimiter;
use crate::routes;
use crate::send_guard::InFlightSends;

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub records: Arc<RecordRepository>,
	pub filters: Arc<FilterConfigRepository>,
	pub notifier: ChangeNotifier,
	pub dataset: Arc<DatasetProvider>,
	pub mailer: Mailer,
	pub translator: FilterTranslator,
	pub rate_limiter: RateLimiter,
	pub in_flight: InFlightSends,
	pub max_upload_size_mb: u64,
}

impl AppState {
	pub fn new(
		pool: SqlitePool,
		notifier: ChangeNotifier,
		mailer: Mailer,
		translator: FilterTranslator,
		rate_limiter: RateLimiter,
		max_upload_size_mb: u64,
	) -> Self {
		let records = Arc::new(RecordRepository::new(pool.clone(), notifier.clone()));
		let filters = Arc::new(FilterConfigRepository::new(pool.clone(), notifier.clone()));
		let dataset = Arc::new(DatasetProvider::new(
			records.clone(),
			filters.clone(),
			notifier.clone(),
		));
		Self {
			pool,
			records,
			filters,
			notifier,
			dataset,
			mailer,
			translator,
			rate_limiter,
			in_flight: InFlightSends::new(),
			max_upload_size_mb,
		}
	}

	pub fn max_upload_bytes(&self) -> usize {
		usize::try_from(self.max_upload_size_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
	}

	/// Starts rebuilding the dataset view on every store change.
	pub fn start_dataset_sync(&self) -> JoinHandle<()> {
		Arc::clone(&self.dataset).spawn_sync()
	}
}

/// Creates the application state from configuration.
///
/// Mail and translation are optional: if either cannot be set up, the
/// failure is logged and the server runs without it.
pub async fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let mailer = Mailer::from_config(config.smtp.as_ref()).unwrap_or_else(|e| {
		tracing::error!(error = %e, "failed to set up SMTP, email sending is disabled");
		Mailer::unconfigured()
	});

	let translator = FilterTranslator::from_config(&config.llm).unwrap_or_else(|e| {
		tracing::error!(error = %e, "failed to set up Gemini client, filter generation is disabled");
		FilterTranslator::unconfigured()
	});

	let state = AppState::new(
		pool,
		ChangeNotifier::default(),
		mailer,
		translator,
		RateLimiter::new(config.rate_limit.per_minute, config.rate_limit.window),
		config.upload.max_upload_size_mb,
	);

	if let Err(e) = state.dataset.refresh().await {
		tracing::warn!(error = %e, "initial dataset view could not be built");
	}
	state
}

pub fn create_router(state: AppState) -> Router {
	let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD));

	let uploads = Router::new()
		.route("/api/parse-excel", post(routes::uploads::parse_sheet))
		.route("/api/uploads", post(routes::uploads::upload_sheet))
		.layer(upload_limit);

	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.route("/api/generate-filters", post(routes::filters::generate_filters))
		.route(
			"/api/records",
			get(routes::records::list_records).delete(routes::records::clear_records),
		)
		.route("/api/data", axum::routing::delete(routes::records::clear_all_data))
		.route("/api/departments", get(routes::records::list_departments))
		.route("/api/records/{id}/draft", get(routes::records::get_draft))
		.route(
			"/api/filters",
			get(routes::filters::get_filters)
				.put(routes::filters::save_filters)
				.delete(routes::filters::clear_filters),
		)
		.route("/api/filters/preview", post(routes::filters::preview_filters))
		.route("/api/filters/reset", post(routes::filters::reset_filters))
		.route("/api/events", get(routes::events::stream_events))
		.route("/api/send-mail", post(routes::mail::send_mail))
		.merge(uploads)
		.with_state(state)
}
