// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for Escalate.
//!
//! - [`RecordRepository`]: the single current upload and its escalation records
//! - [`FilterConfigRepository`]: the persisted filter configuration
//! - [`ChangeNotifier`]: committed writes fan out as [`ChangeEvent`]s

pub mod error;
pub mod filters;
pub mod notify;
pub mod pool;
pub mod records;
pub mod testing;

pub use error::{DbError, Result};
pub use filters::{FilterConfigRepository, FilterConfigStore, StoredFilterConfig};
pub use notify::{ChangeEvent, ChangeNotifier};
pub use pool::{check_health, create_pool, run_migrations};
pub use records::{RecordRepository, RecordStore, Upload};
