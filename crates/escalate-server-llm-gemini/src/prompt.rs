// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Prompt construction and response cleanup.

use escalate_common_core::{operators_for, ColumnKey, ColumnType};

const RULES: &str = "Rules:
- Column comparisons: use column_* operators with compareColumn
- Strings: 'contains' for partial, 'equals' for exact
- Numbers: use appropriate comparison operators
- Booleans: 'equals' with 'true'/'false'
- Default logic: AND";

const FORMAT: &str = r#"{"filters":[{"id":"id","conditions":[{"column":"key","operator":"op","value":0,"compareColumn":"key"}],"logic":"AND"}]}"#;

/// The full instruction sent to the model for a user query.
pub fn build_prompt(query: &str) -> String {
	format!(
		"Convert natural language to filter conditions.\n\n\
		Columns: {}\n\n\
		Operators: {}\n\n\
		{RULES}\n\n\
		Format:\n{FORMAT}\n\n\
		Query: {}\n\n\
		JSON only:",
		columns_line(),
		operators_line(),
		query.trim()
	)
}

fn columns_line() -> String {
	ColumnKey::ALL
		.iter()
		.map(|key| format!("{}({})", key.as_str(), key.column_type()))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Literal operators per type; column-compare operators collapse to `column_*`.
fn operators_line() -> String {
	[ColumnType::String, ColumnType::Number, ColumnType::Boolean]
		.iter()
		.map(|ty| {
			let ops = operators_for(*ty);
			let mut names: Vec<&str> = ops
				.iter()
				.filter(|op| !op.is_column_compare())
				.map(|op| op.as_str())
				.collect();
			if ops.iter().any(|op| op.is_column_compare()) {
				names.push("column_*");
			}
			format!("{ty}({})", names.join(","))
		})
		.collect::<Vec<_>>()
		.join(", ")
}

/// Strips Markdown code fences around a model's JSON answer.
pub fn clean_response(text: &str) -> &str {
	let trimmed = text.trim();
	let without_open = trimmed
		.strip_prefix("```json")
		.or_else(|| trimmed.strip_prefix("```"))
		.unwrap_or(trimmed);
	without_open
		.trim_end()
		.strip_suffix("```")
		.unwrap_or(without_open)
		.trim()
}
