// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation gate for filter configurations.
//!
//! Every configuration that reaches storage, whether authored by a user or
//! produced by the natural-language translator, passes through here. The
//! raw types accept whatever loose JSON a producer emits; [`validate_groups`]
//! turns them into a typed [`FilterConfiguration`] or explains why it can't.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::filter::{FilterCondition, FilterConfiguration, FilterGroup, FilterValue, Logic};
use crate::operator::Operator;
use crate::schema::{is_operator_allowed, ColumnKey, ColumnType};

/// A condition as received on the wire, before any checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterCondition {
	#[serde(default)]
	pub column: String,
	#[serde(default)]
	pub operator: String,
	#[serde(default)]
	pub value: Option<FilterValue>,
	#[serde(default)]
	pub compare_column: Option<String>,
}

/// A group as received on the wire. Ids may be strings or numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFilterGroup {
	#[serde(default)]
	pub id: Option<serde_json::Value>,
	#[serde(default)]
	pub conditions: Vec<RawFilterCondition>,
	#[serde(default)]
	pub logic: Option<String>,
}

impl RawFilterGroup {
	/// The id as text, if one usable id is present.
	pub fn id_text(&self) -> Option<String> {
		match &self.id {
			Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
			Some(serde_json::Value::Number(n)) => Some(n.to_string()),
			_ => None,
		}
	}
}

impl From<&FilterCondition> for RawFilterCondition {
	fn from(c: &FilterCondition) -> Self {
		Self {
			column: c.column.as_str().to_string(),
			operator: c.operator.as_str().to_string(),
			value: Some(c.value.clone()),
			compare_column: c.compare_column.map(|k| k.as_str().to_string()),
		}
	}
}

impl From<&FilterGroup> for RawFilterGroup {
	fn from(g: &FilterGroup) -> Self {
		Self {
			id: Some(serde_json::Value::String(g.id.clone())),
			conditions: g.conditions.iter().map(RawFilterCondition::from).collect(),
			logic: Some(g.logic.as_str().to_string()),
		}
	}
}

/// Parses group logic. Missing logic means AND.
pub fn parse_logic(logic: Option<&str>) -> Result<Logic, ValidationError> {
	match logic.map(str::trim) {
		None | Some("") => Ok(Logic::And),
		Some(s) if s.eq_ignore_ascii_case("and") => Ok(Logic::And),
		Some(s) if s.eq_ignore_ascii_case("or") => Ok(Logic::Or),
		Some(other) => Err(ValidationError::InvalidLogic(other.to_string())),
	}
}

/// Checks one raw condition against the column registry.
pub fn validate_condition(raw: &RawFilterCondition) -> Result<FilterCondition, ValidationError> {
	let column: ColumnKey = raw.column.parse()?;
	let compare_column = match raw.compare_column.as_deref().map(str::trim) {
		None | Some("") => None,
		Some(key) => Some(key.parse::<ColumnKey>()?),
	};
	let value = raw
		.value
		.clone()
		.unwrap_or_else(|| FilterValue::default_for(column.column_type()));

	let condition = FilterCondition {
		column,
		operator: Operator::from(raw.operator.trim()),
		value,
		compare_column,
	};
	check_condition(&condition)?;
	Ok(condition)
}

/// Checks a typed condition against the column registry.
pub fn check_condition(condition: &FilterCondition) -> Result<(), ValidationError> {
	let column_type = condition.column.column_type();
	let op = &condition.operator;
	if !is_operator_allowed(column_type, op) {
		return Err(ValidationError::OperatorNotAllowed {
			column: condition.column.to_string(),
			operator: op.to_string(),
		});
	}

	match (op.is_column_compare(), condition.compare_column) {
		(true, None) => {
			return Err(ValidationError::MissingCompareColumn {
				column: condition.column.to_string(),
				operator: op.to_string(),
			})
		}
		(true, Some(other)) => {
			if other.column_type() != ColumnType::Number {
				return Err(ValidationError::NonNumericCompareColumn(other.to_string()));
			}
			if other == condition.column {
				return Err(ValidationError::SelfComparison(other.to_string()));
			}
		}
		(false, Some(_)) => {
			return Err(ValidationError::UnexpectedCompareColumn {
				column: condition.column.to_string(),
				operator: op.to_string(),
			})
		}
		(false, None) => {
			if column_type == ColumnType::Number && condition.value.to_number().is_nan() {
				return Err(ValidationError::NonNumericValue {
					column: condition.column.to_string(),
					value: condition.value.to_text(),
				});
			}
		}
	}
	Ok(())
}

/// Converts raw groups into a checked configuration.
pub fn validate_groups(raw: &[RawFilterGroup]) -> Result<FilterConfiguration, ValidationError> {
	let mut seen = HashSet::new();
	let mut groups = Vec::with_capacity(raw.len());
	for (index, group) in raw.iter().enumerate() {
		let id = group.id_text().ok_or(ValidationError::MissingGroupId(index))?;
		if !seen.insert(id.clone()) {
			return Err(ValidationError::DuplicateGroupId(id));
		}
		let logic = parse_logic(group.logic.as_deref())?;
		let conditions = group
			.conditions
			.iter()
			.map(validate_condition)
			.collect::<Result<Vec<_>, _>>()?;
		groups.push(FilterGroup {
			id,
			conditions,
			logic,
		});
	}
	Ok(FilterConfiguration::new(groups))
}

/// Checks an already-typed configuration.
pub fn validate_configuration(config: &FilterConfiguration) -> Result<(), ValidationError> {
	let mut seen = HashSet::new();
	for (index, group) in config.groups().iter().enumerate() {
		if group.id.trim().is_empty() {
			return Err(ValidationError::MissingGroupId(index));
		}
		if !seen.insert(group.id.as_str()) {
			return Err(ValidationError::DuplicateGroupId(group.id.clone()));
		}
		for condition in &group.conditions {
			check_condition(condition)?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn raw(value: serde_json::Value) -> Vec<RawFilterGroup> {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn accepts_well_formed_groups() {
		let groups = raw(json!([
			{"id": "a", "conditions": [{"column": "department", "operator": "equals", "value": "Finance"}], "logic": "AND"},
			{"id": "b", "conditions": [{"column": "pendingSince", "operator": "greater_than", "value": 30}], "logic": "OR"}
		]));
		let config = validate_groups(&groups).unwrap();
		assert_eq!(config.len(), 2);
		assert_eq!(config.groups()[1].logic, Logic::Or);
		assert_eq!(config.groups()[1].conditions[0].value, FilterValue::Number(30.0));
	}

	#[test]
	fn default_config_is_valid() {
		validate_configuration(&FilterConfiguration::default_config()).unwrap();
		let round: Vec<RawFilterGroup> = FilterConfiguration::default_config()
			.groups()
			.iter()
			.map(RawFilterGroup::from)
			.collect();
		assert_eq!(
			validate_groups(&round).unwrap(),
			FilterConfiguration::default_config()
		);
	}

	#[test]
	fn rejects_unknown_column() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "priority", "operator": "equals", "value": "high"}]}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::UnknownColumn("priority".to_string())
		);
	}

	#[test]
	fn rejects_operator_type_mismatch() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "department", "operator": "greater_than", "value": 3}]}]));
		assert!(matches!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::OperatorNotAllowed { .. }
		));

		let groups = raw(json!([{"id": "a", "conditions": [{"column": "mailSent", "operator": "contains", "value": "t"}]}]));
		assert!(matches!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::OperatorNotAllowed { .. }
		));
	}

	#[test]
	fn rejects_unknown_operator() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "department", "operator": "starts_with", "value": "F"}]}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::OperatorNotAllowed {
				column: "department".to_string(),
				operator: "starts_with".to_string(),
			}
		);
	}

	#[test]
	fn column_operator_needs_compare_column() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "column_greater_than", "value": 0}]}]));
		assert!(matches!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::MissingCompareColumn { .. }
		));
	}

	#[test]
	fn compare_column_must_be_numeric_and_distinct() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "column_equals", "compareColumn": "department"}]}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::NonNumericCompareColumn("department".to_string())
		);

		let groups = raw(json!([{"id": "a", "conditions": [{"column": "tatDays", "operator": "column_equals", "compareColumn": "tatDays"}]}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::SelfComparison("tatDays".to_string())
		);
	}

	#[test]
	fn compare_column_only_with_column_operators() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "greater_than", "value": 3, "compareColumn": "tatDays"}]}]));
		assert!(matches!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::UnexpectedCompareColumn { .. }
		));
	}

	#[test]
	fn blank_compare_column_counts_as_absent() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "greater_than", "value": 3, "compareColumn": ""}]}]));
		let config = validate_groups(&groups).unwrap();
		assert_eq!(config.groups()[0].conditions[0].compare_column, None);
	}

	#[test]
	fn numeric_literal_must_parse() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "greater_than", "value": "a week"}]}]));
		assert!(matches!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::NonNumericValue { .. }
		));

		let groups = raw(json!([{"id": "a", "conditions": [{"column": "pendingSince", "operator": "greater_than", "value": "30"}]}]));
		assert!(validate_groups(&groups).is_ok());
	}

	#[test]
	fn missing_value_uses_column_default() {
		let groups = raw(json!([{"id": "a", "conditions": [{"column": "mailSent", "operator": "equals", "value": null}]}]));
		let config = validate_groups(&groups).unwrap();
		assert_eq!(
			config.groups()[0].conditions[0].value,
			FilterValue::Text("true".to_string())
		);
	}

	#[test]
	fn group_ids_required_and_unique() {
		let groups = raw(json!([{"conditions": []}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::MissingGroupId(0)
		);

		let groups = raw(json!([{"id": "x", "conditions": []}, {"id": "x", "conditions": []}]));
		assert_eq!(
			validate_groups(&groups).unwrap_err(),
			ValidationError::DuplicateGroupId("x".to_string())
		);
	}

	#[test]
	fn numeric_group_ids_are_accepted() {
		let groups = raw(json!([{"id": 1700000000000u64, "conditions": []}]));
		let config = validate_groups(&groups).unwrap();
		assert_eq!(config.groups()[0].id, "1700000000000");
	}

	#[test]
	fn logic_parsing() {
		assert_eq!(parse_logic(None).unwrap(), Logic::And);
		assert_eq!(parse_logic(Some("or")).unwrap(), Logic::Or);
		assert_eq!(parse_logic(Some(" AND ")).unwrap(), Logic::And);
		assert_eq!(
			parse_logic(Some("XOR")).unwrap_err(),
			ValidationError::InvalidLogic("XOR".to_string())
		);
	}

	#[test]
	fn typed_configuration_with_unknown_operator_is_rejected() {
		let mut config = FilterConfiguration::default_config();
		config.groups_mut()[0].conditions[0].operator = Operator::from("between");
		assert!(validate_configuration(&config).is_err());
	}

	#[test]
	fn empty_configuration_is_valid() {
		assert!(validate_groups(&[]).unwrap().is_empty());
	}
}
