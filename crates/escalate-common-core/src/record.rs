// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Escalation records and typed per-column field access.

use serde::{Deserialize, Serialize};

use crate::schema::ColumnKey;

/// A persisted escalation record.
///
/// `mail_sent` is the only field that changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRecord {
	pub id: i64,
	pub upload_id: i64,
	pub department: String,
	pub file_activity: String,
	pub current_level: String,
	pub pending_since: u32,
	pub tat_days: u32,
	pub next_level: String,
	pub escalation_email: String,
	pub remarks: String,
	pub mail_sent: bool,
}

/// A parsed row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
	pub department: String,
	pub file_activity: String,
	pub current_level: String,
	pub pending_since: u32,
	pub tat_days: u32,
	pub next_level: String,
	pub escalation_email: String,
	#[serde(default)]
	pub remarks: String,
	#[serde(default)]
	pub mail_sent: bool,
}

impl NewRecord {
	/// Whether the row has exceeded its turnaround time.
	pub fn is_overdue(&self) -> bool {
		self.pending_since > self.tat_days
	}

	pub fn into_record(self, id: i64, upload_id: i64) -> EscalationRecord {
		EscalationRecord {
			id,
			upload_id,
			department: self.department,
			file_activity: self.file_activity,
			current_level: self.current_level,
			pending_since: self.pending_since,
			tat_days: self.tat_days,
			next_level: self.next_level,
			escalation_email: self.escalation_email,
			remarks: self.remarks,
			mail_sent: self.mail_sent,
		}
	}
}

/// A borrowed field value, typed per the column registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
	Text(&'a str),
	Number(f64),
	Bool(bool),
}

impl FieldValue<'_> {
	pub fn to_text(&self) -> String {
		match self {
			FieldValue::Text(s) => (*s).to_string(),
			FieldValue::Number(n) => number_text(*n),
			FieldValue::Bool(b) => b.to_string(),
		}
	}

	pub fn to_number(&self) -> f64 {
		match self {
			FieldValue::Text(s) => coerce_number(s),
			FieldValue::Number(n) => *n,
			FieldValue::Bool(b) => bool_number(*b),
		}
	}
}

/// Typed read access to record columns.
pub trait Fields {
	fn field(&self, key: ColumnKey) -> FieldValue<'_>;
}

macro_rules! impl_fields {
	($ty:ty) => {
		impl Fields for $ty {
			fn field(&self, key: ColumnKey) -> FieldValue<'_> {
				match key {
					ColumnKey::Department => FieldValue::Text(&self.department),
					ColumnKey::FileActivity => FieldValue::Text(&self.file_activity),
					ColumnKey::CurrentLevel => FieldValue::Text(&self.current_level),
					ColumnKey::PendingSince => FieldValue::Number(f64::from(self.pending_since)),
					ColumnKey::TatDays => FieldValue::Number(f64::from(self.tat_days)),
					ColumnKey::NextLevel => FieldValue::Text(&self.next_level),
					ColumnKey::EscalationEmail => FieldValue::Text(&self.escalation_email),
					ColumnKey::Remarks => FieldValue::Text(&self.remarks),
					ColumnKey::MailSent => FieldValue::Bool(self.mail_sent),
				}
			}
		}
	};
}

impl_fields!(EscalationRecord);
impl_fields!(NewRecord);

/// Converts free text to a number.
///
/// Blank text is zero. Anything else that does not read as a decimal
/// number is NaN, which fails every comparison.
pub fn coerce_number(text: &str) -> f64 {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return 0.0;
	}
	match trimmed {
		"Infinity" | "+Infinity" => return f64::INFINITY,
		"-Infinity" => return f64::NEG_INFINITY,
		_ => {}
	}
	match trimmed.parse::<f64>() {
		// Rust accepts "inf" and "nan" spellings; those are not numbers here.
		Ok(n) if n.is_finite() => n,
		Ok(_) => f64::NAN,
		Err(_) => f64::NAN,
	}
}

/// Text form of a number. Whole numbers print without a fractional part.
pub fn number_text(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n == f64::INFINITY {
		"Infinity".to_string()
	} else if n == f64::NEG_INFINITY {
		"-Infinity".to_string()
	} else {
		format!("{n}")
	}
}

/// Loose address check: one `@`, no whitespace, and a dot inside the domain.
pub fn is_valid_email(address: &str) -> bool {
	if address.chars().any(char::is_whitespace) {
		return false;
	}
	let Some((local, domain)) = address.split_once('@') else {
		return false;
	};
	if local.is_empty() || domain.contains('@') {
		return false;
	}
	let chars: Vec<char> = domain.chars().collect();
	chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'.')
}

fn bool_number(b: bool) -> f64 {
	if b {
		1.0
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> NewRecord {
		NewRecord {
			department: "Finance".to_string(),
			file_activity: "Budget approval".to_string(),
			current_level: "L1".to_string(),
			pending_since: 12,
			tat_days: 7,
			next_level: "L2".to_string(),
			escalation_email: "l2@example.com".to_string(),
			remarks: String::new(),
			mail_sent: false,
		}
	}

	#[test]
	fn typed_accessor_covers_every_column() {
		let rec = sample().into_record(1, 1);
		for key in ColumnKey::ALL {
			let value = rec.field(key);
			match key.column_type() {
				crate::ColumnType::String => assert!(matches!(value, FieldValue::Text(_))),
				crate::ColumnType::Number => assert!(matches!(value, FieldValue::Number(_))),
				crate::ColumnType::Boolean => assert!(matches!(value, FieldValue::Bool(_))),
			}
		}
	}

	#[test]
	fn overdue_is_strictly_greater() {
		let mut row = sample();
		assert!(row.is_overdue());
		row.pending_since = 7;
		assert!(!row.is_overdue());
	}

	#[test]
	fn coerce_number_rules() {
		assert_eq!(coerce_number(""), 0.0);
		assert_eq!(coerce_number("   "), 0.0);
		assert_eq!(coerce_number(" 42 "), 42.0);
		assert_eq!(coerce_number("1.5"), 1.5);
		assert!(coerce_number("abc").is_nan());
		assert!(coerce_number("inf").is_nan());
		assert!(coerce_number("NaN").is_nan());
		assert_eq!(coerce_number("Infinity"), f64::INFINITY);
	}

	#[test]
	fn number_text_drops_trailing_zero() {
		assert_eq!(number_text(5.0), "5");
		assert_eq!(number_text(2.5), "2.5");
		assert_eq!(number_text(-3.0), "-3");
	}

	#[test]
	fn email_check() {
		assert!(is_valid_email("a@b.co"));
		assert!(is_valid_email("first.last@dept.example.gov"));
		assert!(!is_valid_email("a@b"));
		assert!(!is_valid_email("a@.com"));
		assert!(!is_valid_email("a@com."));
		assert!(!is_valid_email("@b.com"));
		assert!(!is_valid_email("a b@c.com"));
		assert!(!is_valid_email("a@b@c.com"));
		assert!(!is_valid_email(""));
	}

	#[test]
	fn email_check_counts_characters_not_bytes() {
		assert!(is_valid_email("a@é.com"));
		assert!(is_valid_email("a@b.cé"));
		assert!(is_valid_email("ops@bücher.de"));
		assert!(!is_valid_email("a@é."));
		assert!(!is_valid_email("a@.é"));
	}

	#[test]
	fn record_serializes_camel_case() {
		let json = serde_json::to_value(sample().into_record(3, 9)).unwrap();
		assert_eq!(json["uploadId"], 9);
		assert_eq!(json["pendingSince"], 12);
		assert_eq!(json["mailSent"], false);
	}
}
