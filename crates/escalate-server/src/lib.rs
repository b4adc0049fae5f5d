// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Escalate HTTP server.
//!
//! Accepts spreadsheet uploads of pending files, keeps the overdue rows in
//! SQLite, serves them through a rule-based filter configuration, and sends
//! escalation emails to the next authority.

pub mod api;
pub mod api_docs;
pub mod dataset;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod send_guard;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use dataset::{DatasetError, DatasetProvider, DatasetView};
pub use error::ServerError;
pub use escalate_server_config::ServerConfig;
pub use rate_limit::RateLimiter;
pub use send_guard::InFlightSends;
