// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column schema registry.
//!
//! The registry is the single source of truth for which columns exist on an
//! escalation record, what type each column has, and which operators may be
//! used against it. The evaluator, the filter editor and the validation gate
//! for translated filters all read from here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::operator::Operator;

/// The value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
	String,
	Number,
	Boolean,
}

impl ColumnType {
	pub fn as_str(&self) -> &'static str {
		match self {
			ColumnType::String => "string",
			ColumnType::Number => "number",
			ColumnType::Boolean => "boolean",
		}
	}
}

impl fmt::Display for ColumnType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Identifier of a record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
	Department,
	FileActivity,
	CurrentLevel,
	PendingSince,
	TatDays,
	NextLevel,
	EscalationEmail,
	Remarks,
	MailSent,
}

impl ColumnKey {
	pub const ALL: [ColumnKey; 9] = [
		ColumnKey::Department,
		ColumnKey::FileActivity,
		ColumnKey::CurrentLevel,
		ColumnKey::PendingSince,
		ColumnKey::TatDays,
		ColumnKey::NextLevel,
		ColumnKey::EscalationEmail,
		ColumnKey::Remarks,
		ColumnKey::MailSent,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ColumnKey::Department => "department",
			ColumnKey::FileActivity => "fileActivity",
			ColumnKey::CurrentLevel => "currentLevel",
			ColumnKey::PendingSince => "pendingSince",
			ColumnKey::TatDays => "tatDays",
			ColumnKey::NextLevel => "nextLevel",
			ColumnKey::EscalationEmail => "escalationEmail",
			ColumnKey::Remarks => "remarks",
			ColumnKey::MailSent => "mailSent",
		}
	}

	/// Returns the registry entry for this column.
	pub fn descriptor(&self) -> &'static ColumnDescriptor {
		// COLUMNS is declared in the same order as ColumnKey.
		&COLUMNS[*self as usize]
	}

	pub fn column_type(&self) -> ColumnType {
		self.descriptor().column_type
	}

	pub fn label(&self) -> &'static str {
		self.descriptor().label
	}
}

impl fmt::Display for ColumnKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ColumnKey {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ColumnKey::ALL
			.iter()
			.copied()
			.find(|key| key.as_str() == s)
			.ok_or_else(|| ValidationError::UnknownColumn(s.to_string()))
	}
}

/// An immutable column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
	pub key: ColumnKey,
	pub label: &'static str,
	#[serde(rename = "type")]
	pub column_type: ColumnType,
}

/// Every column known to the system, in display order.
pub static COLUMNS: [ColumnDescriptor; 9] = [
	ColumnDescriptor {
		key: ColumnKey::Department,
		label: "Department",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::FileActivity,
		label: "File/Activity",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::CurrentLevel,
		label: "Current Level",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::PendingSince,
		label: "Pending Since (Days)",
		column_type: ColumnType::Number,
	},
	ColumnDescriptor {
		key: ColumnKey::TatDays,
		label: "TAT (Days)",
		column_type: ColumnType::Number,
	},
	ColumnDescriptor {
		key: ColumnKey::NextLevel,
		label: "Next Level",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::EscalationEmail,
		label: "Escalation Authority Email",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::Remarks,
		label: "Remarks",
		column_type: ColumnType::String,
	},
	ColumnDescriptor {
		key: ColumnKey::MailSent,
		label: "Mail Sent Status",
		column_type: ColumnType::Boolean,
	},
];

static STRING_OPERATORS: [Operator; 2] = [Operator::Equals, Operator::Contains];

static NUMBER_OPERATORS: [Operator; 10] = [
	Operator::Equals,
	Operator::GreaterThan,
	Operator::LessThan,
	Operator::GreaterEqual,
	Operator::LessEqual,
	Operator::ColumnEquals,
	Operator::ColumnGreaterThan,
	Operator::ColumnLessThan,
	Operator::ColumnGreaterEqual,
	Operator::ColumnLessEqual,
];

static BOOLEAN_OPERATORS: [Operator; 1] = [Operator::Equals];

/// Looks up the type of a column by its wire identifier.
pub fn column_type(key: &str) -> Result<ColumnType, ValidationError> {
	key.parse::<ColumnKey>().map(|k| k.column_type())
}

/// The operators legal for a column type, in display order.
pub fn operators_for(column_type: ColumnType) -> &'static [Operator] {
	match column_type {
		ColumnType::String => &STRING_OPERATORS,
		ColumnType::Number => &NUMBER_OPERATORS,
		ColumnType::Boolean => &BOOLEAN_OPERATORS,
	}
}

/// Whether `operator` may be used against a column of `column_type`.
pub fn is_operator_allowed(column_type: ColumnType, operator: &Operator) -> bool {
	operators_for(column_type).contains(operator)
}

/// Columns that can take part in a column-to-column comparison.
pub fn numeric_columns() -> impl Iterator<Item = ColumnKey> {
	COLUMNS
		.iter()
		.filter(|c| c.column_type == ColumnType::Number)
		.map(|c| c.key)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registry_order_matches_key_order() {
		for (i, key) in ColumnKey::ALL.iter().enumerate() {
			assert_eq!(COLUMNS[i].key, *key);
			assert_eq!(key.descriptor().key, *key);
		}
	}

	#[test]
	fn column_type_lookup() {
		assert_eq!(column_type("department").unwrap(), ColumnType::String);
		assert_eq!(column_type("pendingSince").unwrap(), ColumnType::Number);
		assert_eq!(column_type("tatDays").unwrap(), ColumnType::Number);
		assert_eq!(column_type("mailSent").unwrap(), ColumnType::Boolean);
	}

	#[test]
	fn unknown_column_is_not_found() {
		let err = column_type("priority").unwrap_err();
		assert!(matches!(err, ValidationError::UnknownColumn(ref c) if c == "priority"));
	}

	#[test]
	fn column_lookup_is_case_sensitive() {
		assert!(column_type("PendingSince").is_err());
	}

	#[test]
	fn string_operators() {
		assert_eq!(
			operators_for(ColumnType::String),
			&[Operator::Equals, Operator::Contains]
		);
	}

	#[test]
	fn boolean_operators() {
		assert_eq!(operators_for(ColumnType::Boolean), &[Operator::Equals]);
	}

	#[test]
	fn number_operators_include_column_compare() {
		let ops = operators_for(ColumnType::Number);
		assert_eq!(ops.len(), 10);
		assert_eq!(ops[0], Operator::Equals);
		assert!(ops.iter().filter(|op| op.is_column_compare()).count() == 5);
		assert!(!ops.contains(&Operator::Contains));
	}

	#[test]
	fn numeric_columns_are_day_counts() {
		let cols: Vec<_> = numeric_columns().collect();
		assert_eq!(cols, vec![ColumnKey::PendingSince, ColumnKey::TatDays]);
	}

	#[test]
	fn column_key_serializes_camel_case() {
		assert_eq!(
			serde_json::to_string(&ColumnKey::EscalationEmail).unwrap(),
			"\"escalationEmail\""
		);
		let key: ColumnKey = serde_json::from_str("\"tatDays\"").unwrap();
		assert_eq!(key, ColumnKey::TatDays);
	}

	#[test]
	fn descriptor_serializes_type_field() {
		let json = serde_json::to_value(ColumnKey::MailSent.descriptor()).unwrap();
		assert_eq!(json["key"], "mailSent");
		assert_eq!(json["type"], "boolean");
		assert_eq!(json["label"], "Mail Sent Status");
	}
}
