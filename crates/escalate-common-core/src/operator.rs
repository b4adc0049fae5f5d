// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;

/// A filter operator.
///
/// Operators that are not recognised are kept as [`Operator::Unknown`] so a
/// stored configuration written by a newer client still round-trips. The
/// evaluator treats them as an automatic pass; the validation gate rejects
/// them before they can be stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
	Equals,
	Contains,
	GreaterThan,
	LessThan,
	GreaterEqual,
	LessEqual,
	ColumnEquals,
	ColumnGreaterThan,
	ColumnLessThan,
	ColumnGreaterEqual,
	ColumnLessEqual,
	Unknown(String),
}

/// A numeric relation shared by literal and column-compare operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
	Eq,
	Gt,
	Lt,
	Ge,
	Le,
}

impl Relation {
	/// Applies the relation. Any comparison involving NaN is false.
	pub fn compare(&self, left: f64, right: f64) -> bool {
		match self {
			Relation::Eq => left == right,
			Relation::Gt => left > right,
			Relation::Lt => left < right,
			Relation::Ge => left >= right,
			Relation::Le => left <= right,
		}
	}
}

impl Operator {
	pub fn as_str(&self) -> &str {
		match self {
			Operator::Equals => "equals",
			Operator::Contains => "contains",
			Operator::GreaterThan => "greater_than",
			Operator::LessThan => "less_than",
			Operator::GreaterEqual => "greater_equal",
			Operator::LessEqual => "less_equal",
			Operator::ColumnEquals => "column_equals",
			Operator::ColumnGreaterThan => "column_greater_than",
			Operator::ColumnLessThan => "column_less_than",
			Operator::ColumnGreaterEqual => "column_greater_equal",
			Operator::ColumnLessEqual => "column_less_equal",
			Operator::Unknown(s) => s,
		}
	}

	/// Human readable label used by the filter editor.
	pub fn label(&self) -> &str {
		match self {
			Operator::Equals => "Equals",
			Operator::Contains => "Contains",
			Operator::GreaterThan => "Greater than",
			Operator::LessThan => "Less than",
			Operator::GreaterEqual => "Greater than or equal",
			Operator::LessEqual => "Less than or equal",
			Operator::ColumnEquals => "Equals column",
			Operator::ColumnGreaterThan => "Greater than column",
			Operator::ColumnLessThan => "Less than column",
			Operator::ColumnGreaterEqual => "Greater than or equal to column",
			Operator::ColumnLessEqual => "Less than or equal to column",
			Operator::Unknown(s) => s,
		}
	}

	pub fn is_column_compare(&self) -> bool {
		self.column_relation().is_some()
	}

	pub fn is_known(&self) -> bool {
		!matches!(self, Operator::Unknown(_))
	}

	/// The relation applied between two record fields, for column-compare
	/// operators.
	pub fn column_relation(&self) -> Option<Relation> {
		match self {
			Operator::ColumnEquals => Some(Relation::Eq),
			Operator::ColumnGreaterThan => Some(Relation::Gt),
			Operator::ColumnLessThan => Some(Relation::Lt),
			Operator::ColumnGreaterEqual => Some(Relation::Ge),
			Operator::ColumnLessEqual => Some(Relation::Le),
			_ => None,
		}
	}

	/// The relation applied between a record field and a literal, for the
	/// numeric literal operators.
	pub fn literal_relation(&self) -> Option<Relation> {
		match self {
			Operator::GreaterThan => Some(Relation::Gt),
			Operator::LessThan => Some(Relation::Lt),
			Operator::GreaterEqual => Some(Relation::Ge),
			Operator::LessEqual => Some(Relation::Le),
			_ => None,
		}
	}
}

impl From<String> for Operator {
	fn from(s: String) -> Self {
		match s.as_str() {
			"equals" => Operator::Equals,
			"contains" => Operator::Contains,
			"greater_than" => Operator::GreaterThan,
			"less_than" => Operator::LessThan,
			"greater_equal" => Operator::GreaterEqual,
			"less_equal" => Operator::LessEqual,
			"column_equals" => Operator::ColumnEquals,
			"column_greater_than" => Operator::ColumnGreaterThan,
			"column_less_than" => Operator::ColumnLessThan,
			"column_greater_equal" => Operator::ColumnGreaterEqual,
			"column_less_equal" => Operator::ColumnLessEqual,
			_ => Operator::Unknown(s),
		}
	}
}

impl From<&str> for Operator {
	fn from(s: &str) -> Self {
		Operator::from(s.to_string())
	}
}

impl From<Operator> for String {
	fn from(op: Operator) -> Self {
		match op {
			Operator::Unknown(s) => s,
			other => other.as_str().to_string(),
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
