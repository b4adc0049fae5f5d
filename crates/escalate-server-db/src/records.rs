// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upload and escalation record repository.
//!
//! The store holds at most one upload. Replacing it removes every record of
//! the previous upload in the same transaction, so record sets never
//! accumulate across uploads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use escalate_common_core::{EscalationRecord, NewRecord};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::FromRow;

use crate::error::{DbError, Result};
use crate::notify::{ChangeEvent, ChangeNotifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
	pub id: i64,
	pub filename: String,
	pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RecordRow {
	id: i64,
	upload_id: i64,
	department: String,
	file_activity: String,
	current_level: String,
	pending_since: i64,
	tat_days: i64,
	next_level: String,
	escalation_email: String,
	remarks: String,
	mail_sent: bool,
}

impl TryFrom<RecordRow> for EscalationRecord {
	type Error = DbError;

	fn try_from(row: RecordRow) -> Result<Self> {
		let days = |value: i64, column: &str| {
			u32::try_from(value).map_err(|_| DbError::Internal(format!("Invalid {column}: {value}")))
		};
		Ok(EscalationRecord {
			pending_since: days(row.pending_since, "pending_since")?,
			tat_days: days(row.tat_days, "tat_days")?,
			id: row.id,
			upload_id: row.upload_id,
			department: row.department,
			file_activity: row.file_activity,
			current_level: row.current_level,
			next_level: row.next_level,
			escalation_email: row.escalation_email,
			remarks: row.remarks,
			mail_sent: row.mail_sent,
		})
	}
}

const SELECT_RECORDS: &str = r#"
	SELECT id, upload_id, department, file_activity, current_level, pending_since,
		tat_days, next_level, escalation_email, remarks, mail_sent
	FROM records
"#;

#[derive(Clone)]
pub struct RecordRepository {
	pool: SqlitePool,
	notifier: ChangeNotifier,
}

impl RecordRepository {
	pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
		Self { pool, notifier }
	}

	pub fn notifier(&self) -> &ChangeNotifier {
		&self.notifier
	}

	/// Stores upload metadata, dropping any previous upload.
	#[tracing::instrument(skip(self))]
	pub async fn save_upload(&self, filename: &str) -> Result<Upload> {
		let mut tx = self.pool.begin().await?;
		sqlx::query("DELETE FROM uploads").execute(&mut *tx).await?;
		let upload = insert_upload(&mut *tx, filename).await?;
		tx.commit().await?;
		tracing::debug!(upload_id = upload.id, "upload saved");
		Ok(upload)
	}

	/// Replaces the stored record set with `records` under `upload_id`.
	#[tracing::instrument(skip(self, records), fields(count = records.len()))]
	pub async fn save_records(&self, upload_id: i64, records: &[NewRecord]) -> Result<usize> {
		let mut tx = self.pool.begin().await?;
		sqlx::query("DELETE FROM records").execute(&mut *tx).await?;
		insert_records(&mut *tx, upload_id, records).await?;
		tx.commit().await?;

		self
			.notifier
			.publish(ChangeEvent::records_replaced(upload_id, records.len()));
		Ok(records.len())
	}

	/// Clears everything record-related and stores a new upload with its
	/// records, atomically.
	#[tracing::instrument(skip(self, records), fields(count = records.len()))]
	pub async fn replace_upload(&self, filename: &str, records: &[NewRecord]) -> Result<Upload> {
		let mut tx = self.pool.begin().await?;
		sqlx::query("DELETE FROM records").execute(&mut *tx).await?;
		sqlx::query("DELETE FROM uploads").execute(&mut *tx).await?;
		let upload = insert_upload(&mut *tx, filename).await?;
		insert_records(&mut *tx, upload.id, records).await?;
		tx.commit().await?;

		tracing::info!(upload_id = upload.id, count = records.len(), "upload replaced");
		self
			.notifier
			.publish(ChangeEvent::records_replaced(upload.id, records.len()));
		Ok(upload)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_all_records(&self) -> Result<Vec<EscalationRecord>> {
		let rows: Vec<RecordRow> = sqlx::query_as(&format!("{SELECT_RECORDS} ORDER BY id"))
			.fetch_all(&self.pool)
			.await?;
		rows.into_iter().map(EscalationRecord::try_from).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_records_by_upload(&self, upload_id: i64) -> Result<Vec<EscalationRecord>> {
		let rows: Vec<RecordRow> =
			sqlx::query_as(&format!("{SELECT_RECORDS} WHERE upload_id = ?1 ORDER BY id"))
				.bind(upload_id)
				.fetch_all(&self.pool)
				.await?;
		rows.into_iter().map(EscalationRecord::try_from).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_record(&self, id: i64) -> Result<Option<EscalationRecord>> {
		let row: Option<RecordRow> = sqlx::query_as(&format!("{SELECT_RECORDS} WHERE id = ?1"))
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;
		row.map(EscalationRecord::try_from).transpose()
	}

	/// Sets the mail flag of one record.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no record has this id.
	#[tracing::instrument(skip(self))]
	pub async fn update_mail_sent(&self, id: i64, mail_sent: bool) -> Result<()> {
		let result = sqlx::query("UPDATE records SET mail_sent = ?1 WHERE id = ?2")
			.bind(mail_sent)
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("record {id}")));
		}
		self.notifier.publish(ChangeEvent::mail_sent(id, mail_sent));
		Ok(())
	}

	/// Deletes every record, keeping upload metadata.
	#[tracing::instrument(skip(self))]
	pub async fn clear_records(&self) -> Result<u64> {
		let result = sqlx::query("DELETE FROM records")
			.execute(&self.pool)
			.await?;
		tracing::info!(deleted = result.rows_affected(), "records cleared");
		self.notifier.publish(ChangeEvent::records_cleared());
		Ok(result.rows_affected())
	}

	/// Deletes all stored data: records, uploads and the filter configuration.
	#[tracing::instrument(skip(self))]
	pub async fn clear_all(&self) -> Result<()> {
		let mut tx = self.pool.begin().await?;
		sqlx::query("DELETE FROM records").execute(&mut *tx).await?;
		sqlx::query("DELETE FROM uploads").execute(&mut *tx).await?;
		sqlx::query("DELETE FROM filter_config")
			.execute(&mut *tx)
			.await?;
		tx.commit().await?;

		tracing::info!("all stored data cleared");
		self.notifier.publish(ChangeEvent::records_cleared());
		self.notifier.publish(ChangeEvent::filters_cleared());
		Ok(())
	}

	/// Distinct department names, sorted.
	#[tracing::instrument(skip(self))]
	pub async fn get_departments(&self) -> Result<Vec<String>> {
		let rows: Vec<(String,)> =
			sqlx::query_as("SELECT DISTINCT department FROM records ORDER BY department")
				.fetch_all(&self.pool)
				.await?;
		Ok(rows.into_iter().map(|(d,)| d).collect())
	}

	#[tracing::instrument(skip(self))]
	pub async fn current_upload(&self) -> Result<Option<Upload>> {
		let row: Option<(i64, String, String)> =
			sqlx::query_as("SELECT id, filename, uploaded_at FROM uploads ORDER BY id DESC LIMIT 1")
				.fetch_optional(&self.pool)
				.await?;
		row
			.map(|(id, filename, uploaded_at)| {
				Ok(Upload {
					id,
					filename,
					uploaded_at: parse_timestamp(&uploaded_at, "uploaded_at")?,
				})
			})
			.transpose()
	}
}

async fn insert_upload(conn: &mut SqliteConnection, filename: &str) -> Result<Upload> {
	let uploaded_at = Utc::now();
	let result = sqlx::query("INSERT INTO uploads (filename, uploaded_at) VALUES (?1, ?2)")
		.bind(filename)
		.bind(uploaded_at.to_rfc3339())
		.execute(&mut *conn)
		.await?;
	Ok(Upload {
		id: result.last_insert_rowid(),
		filename: filename.to_string(),
		uploaded_at,
	})
}

async fn insert_records(
	conn: &mut SqliteConnection,
	upload_id: i64,
	records: &[NewRecord],
) -> Result<()> {
	for record in records {
		sqlx::query(
			r#"
			INSERT INTO records (upload_id, department, file_activity, current_level, pending_since,
				tat_days, next_level, escalation_email, remarks, mail_sent)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
			"#,
		)
		.bind(upload_id)
		.bind(&record.department)
		.bind(&record.file_activity)
		.bind(&record.current_level)
		.bind(i64::from(record.pending_since))
		.bind(i64::from(record.tat_days))
		.bind(&record.next_level)
		.bind(&record.escalation_email)
		.bind(&record.remarks)
		.bind(record.mail_sent)
		.execute(&mut *conn)
		.await?;
	}
	Ok(())
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

#[async_trait]
pub trait RecordStore: Send + Sync {
	async fn save_upload(&self, filename: &str) -> Result<Upload>;
	async fn save_records(&self, upload_id: i64, records: &[NewRecord]) -> Result<usize>;
	async fn replace_upload(&self, filename: &str, records: &[NewRecord]) -> Result<Upload>;
	async fn get_all_records(&self) -> Result<Vec<EscalationRecord>>;
	async fn get_record(&self, id: i64) -> Result<Option<EscalationRecord>>;
	async fn update_mail_sent(&self, id: i64, mail_sent: bool) -> Result<()>;
	async fn clear_records(&self) -> Result<u64>;
	async fn clear_all(&self) -> Result<()>;
	async fn get_departments(&self) -> Result<Vec<String>>;
	async fn current_upload(&self) -> Result<Option<Upload>>;
}

#[async_trait]
impl RecordStore for RecordRepository {
	async fn save_upload(&self, filename: &str) -> Result<Upload> {
		self.save_upload(filename).await
	}

	async fn save_records(&self, upload_id: i64, records: &[NewRecord]) -> Result<usize> {
		self.save_records(upload_id, records).await
	}

	async fn replace_upload(&self, filename: &str, records: &[NewRecord]) -> Result<Upload> {
		self.replace_upload(filename, records).await
	}

	async fn get_all_records(&self) -> Result<Vec<EscalationRecord>> {
		self.get_all_records().await
	}

	async fn get_record(&self, id: i64) -> Result<Option<EscalationRecord>> {
		self.get_record(id).await
	}

	async fn update_mail_sent(&self, id: i64, mail_sent: bool) -> Result<()> {
		self.update_mail_sent(id, mail_sent).await
	}

	async fn clear_records(&self) -> Result<u64> {
		self.clear_records().await
	}

	async fn clear_all(&self) -> Result<()> {
		self.clear_all().await
	}

	async fn get_departments(&self) -> Result<Vec<String>> {
		self.get_departments().await
	}

	async fn current_upload(&self) -> Result<Option<Upload>> {
		self.current_upload().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_repositories, new_record as row};

	#[tokio::test]
	async fn replace_upload_stores_records_in_order() {
		let (repo, _, _) = create_test_repositories().await;
		let upload = repo
			.replace_upload("a.xlsx", &[row("Finance", 10, 5), row("HR", 9, 2)])
			.await
			.unwrap();

		let records = repo.get_all_records().await.unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].department, "Finance");
		assert_eq!(records[1].department, "HR");
		assert!(records.iter().all(|r| r.upload_id == upload.id));
		assert_eq!(repo.current_upload().await.unwrap().unwrap().filename, "a.xlsx");
	}

	#[tokio::test]
	async fn new_upload_replaces_previous_records() {
		let (repo, _, _) = create_test_repositories().await;
		repo
			.replace_upload("first.csv", &[row("Finance", 10, 5), row("HR", 9, 2)])
			.await
			.unwrap();
		let second = repo
			.replace_upload("second.csv", &[row("Legal", 4, 1)])
			.await
			.unwrap();

		let records = repo.get_all_records().await.unwrap();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].upload_id, second.id);
		assert_eq!(repo.current_upload().await.unwrap().unwrap().id, second.id);
	}

	#[tokio::test]
	async fn save_upload_then_records() {
		let (repo, _, _) = create_test_repositories().await;
		let upload = repo.save_upload("sheet.xls").await.unwrap();
		let count = repo
			.save_records(upload.id, &[row("Ops", 3, 1)])
			.await
			.unwrap();
		assert_eq!(count, 1);
		assert_eq!(repo.get_records_by_upload(upload.id).await.unwrap().len(), 1);
		assert!(repo.get_records_by_upload(upload.id + 1).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn update_mail_sent_flips_flag_and_notifies() {
		let (repo, _, notifier) = create_test_repositories().await;
		repo.replace_upload("a.csv", &[row("Finance", 10, 5)]).await.unwrap();
		let id = repo.get_all_records().await.unwrap()[0].id;

		let mut events = notifier.subscribe();
		repo.update_mail_sent(id, true).await.unwrap();

		assert!(repo.get_record(id).await.unwrap().unwrap().mail_sent);
		match events.recv().await.unwrap() {
			ChangeEvent::MailSent(data) => {
				assert_eq!(data.record_id, id);
				assert!(data.mail_sent);
			}
			other => panic!("unexpected event {other:?}"),
		}
	}

	#[tokio::test]
	async fn update_mail_sent_unknown_record_is_not_found() {
		let (repo, _, _) = create_test_repositories().await;
		let err = repo.update_mail_sent(404, true).await.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn get_record_missing_is_none() {
		let (repo, _, _) = create_test_repositories().await;
		assert!(repo.get_record(1).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn departments_are_distinct_and_sorted() {
		let (repo, _, _) = create_test_repositories().await;
		repo
			.replace_upload(
				"a.csv",
				&[row("Legal", 5, 1), row("Finance", 5, 1), row("Legal", 7, 2)],
			)
			.await
			.unwrap();
		assert_eq!(repo.get_departments().await.unwrap(), vec!["Finance", "Legal"]);
	}

	#[tokio::test]
	async fn clear_records_keeps_upload() {
		let (repo, _, _) = create_test_repositories().await;
		repo.replace_upload("a.csv", &[row("Finance", 10, 5)]).await.unwrap();
		assert_eq!(repo.clear_records().await.unwrap(), 1);
		assert!(repo.get_all_records().await.unwrap().is_empty());
		assert!(repo.current_upload().await.unwrap().is_some());
	}

	#[tokio::test]
	async fn clear_all_removes_everything() {
		let (repo, filters, notifier) = create_test_repositories().await;
		repo.replace_upload("a.csv", &[row("Finance", 10, 5)]).await.unwrap();
		filters.reset().await.unwrap();

		let mut events = notifier.subscribe();
		repo.clear_all().await.unwrap();

		assert!(repo.get_all_records().await.unwrap().is_empty());
		assert!(repo.current_upload().await.unwrap().is_none());
		assert!(filters.load().await.unwrap().is_none());
		assert_eq!(events.recv().await.unwrap().event_type(), "records.cleared");
		assert_eq!(events.recv().await.unwrap().event_type(), "filters.cleared");
	}

	#[tokio::test]
	async fn stored_row_with_negative_days_is_rejected() {
		let (repo, _, _) = create_test_repositories().await;
		let upload = repo.save_upload("a.csv").await.unwrap();
		// CHECK constraint keeps bad rows out entirely.
		let result = sqlx::query(
			"INSERT INTO records (upload_id, department, file_activity, current_level, pending_since, tat_days, next_level, escalation_email) VALUES (?1, 'x', 'x', 'x', -1, 0, 'x', 'x')",
		)
		.bind(upload.id)
		.execute(&repo.pool)
		.await;
		assert!(result.is_err());
	}
}
