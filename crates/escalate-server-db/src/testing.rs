// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests that need a migrated database.

use escalate_common_core::NewRecord;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::notify::ChangeNotifier;
use crate::{FilterConfigRepository, RecordRepository};

/// An in-memory database. One connection, so every query sees the same data.
pub async fn create_test_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap();
	crate::run_migrations(&pool).await.unwrap();
	pool
}

/// Both repositories over one fresh database, sharing a notifier.
pub async fn create_test_repositories() -> (RecordRepository, FilterConfigRepository, ChangeNotifier) {
	let pool = create_test_pool().await;
	let notifier = ChangeNotifier::default();
	(
		RecordRepository::new(pool.clone(), notifier.clone()),
		FilterConfigRepository::new(pool, notifier.clone()),
		notifier,
	)
}

/// A minimal overdue-or-not row for seeding tests.
pub fn new_record(department: &str, pending_since: u32, tat_days: u32) -> NewRecord {
	NewRecord {
		department: department.to_string(),
		file_activity: format!("{department} file"),
		current_level: "L1".to_string(),
		pending_since,
		tat_days,
		next_level: "L2".to_string(),
		escalation_email: "boss@example.com".to_string(),
		remarks: String::new(),
		mail_sent: false,
	}
}
