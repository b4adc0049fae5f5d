// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-condition evaluation.
//!
//! Evaluation is total: it never fails. Values that cannot be read as
//! numbers become NaN and fail every numeric comparison. Operators the
//! evaluator does not recognise pass.

use crate::filter::FilterCondition;
use crate::operator::Operator;
use crate::record::{FieldValue, Fields};

/// Evaluates one condition against a record.
pub fn evaluate<R: Fields + ?Sized>(record: &R, condition: &FilterCondition) -> bool {
	if let (Some(relation), Some(other)) = (
		condition.operator.column_relation(),
		condition.compare_column,
	) {
		let left = record.field(condition.column).to_number();
		let right = record.field(other).to_number();
		return relation.compare(left, right);
	}

	let actual = record.field(condition.column);
	match &condition.operator {
		Operator::Equals => match actual {
			FieldValue::Bool(b) => b == condition.value.is_true_literal(),
			_ => actual.to_text().to_lowercase() == condition.value.to_text().to_lowercase(),
		},
		Operator::Contains => actual
			.to_text()
			.to_lowercase()
			.contains(&condition.value.to_text().to_lowercase()),
		op => match op.literal_relation() {
			Some(relation) => relation.compare(actual.to_number(), condition.value.to_number()),
			// Unknown operators, and column-compare operators missing their
			// second column, let the record through.
			None => true,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filter::FilterValue;
	use crate::record::NewRecord;
	use crate::schema::ColumnKey;
	use proptest::prelude::*;

	fn record(pending_since: u32, tat_days: u32) -> NewRecord {
		NewRecord {
			department: "Finance".to_string(),
			file_activity: "Vendor Payment".to_string(),
			current_level: "Section Officer".to_string(),
			pending_since,
			tat_days,
			next_level: "Deputy Secretary".to_string(),
			escalation_email: "ds@example.gov".to_string(),
			remarks: "awaiting sign-off".to_string(),
			mail_sent: false,
		}
	}

	fn cond(column: ColumnKey, op: &str, value: impl Into<FilterValue>) -> FilterCondition {
		FilterCondition::new(column, Operator::from(op), value)
	}

	#[test]
	fn pending_reached_tat_matches() {
		let c = FilterCondition::compare(
			ColumnKey::PendingSince,
			Operator::ColumnGreaterEqual,
			ColumnKey::TatDays,
		);
		assert!(evaluate(&record(10, 5), &c));
		assert!(evaluate(&record(5, 5), &c));
		assert!(!evaluate(&record(3, 5), &c));
	}

	#[test]
	fn equals_on_strings_ignores_case() {
		let r = record(1, 1);
		assert!(evaluate(&r, &cond(ColumnKey::Department, "equals", "finance")));
		assert!(evaluate(&r, &cond(ColumnKey::Department, "equals", "FINANCE")));
		assert!(!evaluate(&r, &cond(ColumnKey::Department, "equals", "Fin")));
	}

	#[test]
	fn contains_ignores_case() {
		let r = record(1, 1);
		assert!(evaluate(&r, &cond(ColumnKey::FileActivity, "contains", "PAYMENT")));
		assert!(evaluate(&r, &cond(ColumnKey::FileActivity, "contains", "")));
		assert!(!evaluate(&r, &cond(ColumnKey::FileActivity, "contains", "invoice")));
	}

	#[test]
	fn equals_on_numbers_compares_text() {
		let r = record(30, 7);
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "equals", 30.0)));
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "equals", "30")));
		assert!(!evaluate(&r, &cond(ColumnKey::PendingSince, "equals", 31.0)));
	}

	#[test]
	fn literal_relations() {
		let r = record(40, 7);
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "greater_than", 30.0)));
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "greater_than", "30")));
		assert!(!evaluate(&r, &cond(ColumnKey::PendingSince, "less_than", 30.0)));
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "greater_equal", 40.0)));
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "less_equal", 40.0)));
	}

	#[test]
	fn non_numeric_literal_never_matches() {
		let r = record(40, 7);
		for op in ["greater_than", "less_than", "greater_equal", "less_equal"] {
			assert!(!evaluate(&r, &cond(ColumnKey::PendingSince, op, "lots")));
		}
	}

	#[test]
	fn blank_literal_reads_as_zero() {
		let r = record(0, 7);
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "greater_equal", "")));
	}

	#[test]
	fn numeric_relation_on_text_column_uses_nan() {
		let r = record(1, 1);
		assert!(!evaluate(&r, &cond(ColumnKey::Department, "greater_than", 0.0)));
	}

	#[test]
	fn boolean_equals_uses_strict_literal() {
		let mut r = record(1, 1);
		r.mail_sent = true;
		assert!(evaluate(&r, &cond(ColumnKey::MailSent, "equals", "true")));
		assert!(evaluate(&r, &cond(ColumnKey::MailSent, "equals", true)));
		for lax in ["True", "TRUE", "1", "yes", "sent"] {
			assert!(!evaluate(&r, &cond(ColumnKey::MailSent, "equals", lax)), "{lax}");
		}

		r.mail_sent = false;
		for falsy in ["false", "True", "1", "yes", ""] {
			assert!(evaluate(&r, &cond(ColumnKey::MailSent, "equals", falsy)), "{falsy}");
		}
		assert!(!evaluate(&r, &cond(ColumnKey::MailSent, "equals", "true")));
	}

	#[test]
	fn unknown_operator_passes() {
		let r = record(1, 1);
		assert!(evaluate(&r, &cond(ColumnKey::Department, "starts_with", "zzz")));
		assert!(evaluate(&r, &cond(ColumnKey::PendingSince, "", 0.0)));
	}

	#[test]
	fn column_operator_without_compare_column_passes() {
		let r = record(1, 100);
		let c = cond(ColumnKey::PendingSince, "column_greater_than", 0.0);
		assert!(evaluate(&r, &c));
	}

	#[test]
	fn contains_on_boolean_uses_text_form() {
		let mut r = record(1, 1);
		r.mail_sent = true;
		assert!(evaluate(&r, &cond(ColumnKey::MailSent, "contains", "tru")));
	}

	proptest! {
		#[test]
		fn column_greater_than_mirrors_less_than(a in 0u32..10_000, b in 0u32..10_000) {
			let r = record(a, b);
			let gt = FilterCondition::compare(ColumnKey::PendingSince, Operator::ColumnGreaterThan, ColumnKey::TatDays);
			let lt = FilterCondition::compare(ColumnKey::TatDays, Operator::ColumnLessThan, ColumnKey::PendingSince);
			prop_assert_eq!(evaluate(&r, &gt), evaluate(&r, &lt));
		}

		#[test]
		fn column_equals_is_symmetric(a in 0u32..10_000, b in 0u32..10_000) {
			let r = record(a, b);
			let ab = FilterCondition::compare(ColumnKey::PendingSince, Operator::ColumnEquals, ColumnKey::TatDays);
			let ba = FilterCondition::compare(ColumnKey::TatDays, Operator::ColumnEquals, ColumnKey::PendingSince);
			prop_assert_eq!(evaluate(&r, &ab), evaluate(&r, &ba));
			prop_assert_eq!(evaluate(&r, &ab), a == b);
		}

		#[test]
		fn column_greater_equal_is_complement_of_less_than(a in 0u32..10_000, b in 0u32..10_000) {
			let r = record(a, b);
			let ge = FilterCondition::compare(ColumnKey::PendingSince, Operator::ColumnGreaterEqual, ColumnKey::TatDays);
			let lt = FilterCondition::compare(ColumnKey::PendingSince, Operator::ColumnLessThan, ColumnKey::TatDays);
			prop_assert_ne!(evaluate(&r, &ge), evaluate(&r, &lt));
		}

		#[test]
		fn contains_is_case_insensitive(needle in "[a-zA-Z]{0,6}") {
			let mut r = record(1, 1);
			r.remarks = format!("prefix {needle} suffix");
			let upper = cond(ColumnKey::Remarks, "contains", needle.to_uppercase().as_str());
			let lower = cond(ColumnKey::Remarks, "contains", needle.to_lowercase().as_str());
			prop_assert!(evaluate(&r, &upper));
			prop_assert!(evaluate(&r, &lower));
		}

		#[test]
		fn unknown_operators_always_pass(op in "[a-z_]{1,20}", value in ".*") {
			prop_assume!(!Operator::from(op.as_str()).is_known());
			let r = record(1, 2);
			for key in ColumnKey::ALL {
				prop_assert!(evaluate(&r, &cond(key, &op, value.as_str())));
			}
		}
	}
}
