// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Reasons a filter configuration is rejected by the validation gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("unknown column: {0}")]
	UnknownColumn(String),

	#[error("operator {operator} is not valid for column {column}")]
	OperatorNotAllowed { column: String, operator: String },

	#[error("operator {operator} on column {column} requires a compareColumn")]
	MissingCompareColumn { column: String, operator: String },

	#[error("compareColumn is only valid with column comparison operators, got {operator} on {column}")]
	UnexpectedCompareColumn { column: String, operator: String },

	#[error("compareColumn {0} is not a numeric column")]
	NonNumericCompareColumn(String),

	#[error("column {0} cannot be compared with itself")]
	SelfComparison(String),

	#[error("value {value:?} for column {column} is not a number")]
	NonNumericValue { column: String, value: String },

	#[error("filter group {0} is missing an id")]
	MissingGroupId(usize),

	#[error("duplicate filter group id: {0}")]
	DuplicateGroupId(String),

	#[error("invalid group logic: {0}")]
	InvalidLogic(String),
}
