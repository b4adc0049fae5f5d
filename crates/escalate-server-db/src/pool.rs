// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

use crate::error::DbError;

const MIGRATIONS: [(&str, &str); 2] = [
	(
		"001_create_uploads_and_records",
		include_str!("../migrations/001_create_uploads_and_records.sql"),
	),
	(
		"002_create_filter_config",
		include_str!("../migrations/002_create_filter_config.sql"),
	),
];

/// Create a SqlitePool with WAL mode.
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections.max(1))
		.connect_with(options)
		.await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Applies every migration. Safe to run on each start.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		for stmt in statements(sql) {
			sqlx::query(&stmt).execute(pool).await?;
		}
		tracing::debug!(migration = name, "migration applied");
	}
	Ok(())
}

/// Round-trips a trivial query to confirm the database is reachable.
#[tracing::instrument(skip(pool))]
pub async fn check_health(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query("SELECT 1").execute(pool).await?;
	Ok(())
}

/// Splits a migration file into statements. Comment lines are dropped
/// before splitting, so a `;` inside a comment never ends a statement.
fn statements(sql: &str) -> Vec<String> {
	let code: String = sql
		.lines()
		.filter(|line| !line.trim_start().starts_with("--"))
		.collect::<Vec<_>>()
		.join("\n");
	code
		.split(';')
		.map(str::trim)
		.filter(|chunk| !chunk.is_empty())
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn statements_skip_comments_and_blanks() {
		let sql = "-- header\n\nCREATE TABLE a (x INTEGER);\n-- trailing\n";
		let stmts = statements(sql);
		assert_eq!(stmts.len(), 1);
		assert!(stmts[0].contains("CREATE TABLE a"));
	}

	#[test]
	fn semicolons_in_comments_do_not_split() {
		let sql = "-- keep one; drop the rest\nCREATE TABLE a (x INTEGER);\n  -- note; more\nCREATE TABLE b (y INTEGER);\n";
		let stmts = statements(sql);
		assert_eq!(stmts.len(), 2);
		assert!(stmts[0].starts_with("CREATE TABLE a"));
		assert!(stmts[1].starts_with("CREATE TABLE b"));
	}

	#[test]
	fn bundled_migrations_have_no_comment_fragments() {
		for (name, sql) in MIGRATIONS {
			for stmt in statements(sql) {
				assert!(
					stmt.starts_with("CREATE"),
					"{name}: unexpected statement start: {stmt}"
				);
			}
		}
	}

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = crate::testing::create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();
	}

	#[tokio::test]
	async fn health_check_on_open_pool() {
		let pool = crate::testing::create_test_pool().await;
		check_health(&pool).await.unwrap();
		pool.close().await;
		assert!(check_health(&pool).await.is_err());
	}

	#[tokio::test]
	async fn creates_file_database() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("test.db").display());
		let pool = create_pool(&url, 2).await.unwrap();
		run_migrations(&pool).await.unwrap();
		pool.close().await;
		assert!(dir.path().join("test.db").exists());
	}
}
