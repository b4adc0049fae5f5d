// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filter configuration model and editing helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operator::Operator;
use crate::record::{coerce_number, number_text};
use crate::schema::{numeric_columns, operators_for, ColumnKey, ColumnType};

/// Id of the group created by [`FilterConfiguration::default_config`].
pub const DEFAULT_GROUP_ID: &str = "default";

/// The literal side of a condition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	Number(f64),
	Bool(bool),
	Text(String),
}

impl Serialize for FilterValue {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			// Whole numbers go out as integers so `30` round-trips as `30`.
			FilterValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
				serializer.serialize_i64(*n as i64)
			}
			FilterValue::Number(n) => serializer.serialize_f64(*n),
			FilterValue::Bool(b) => serializer.serialize_bool(*b),
			FilterValue::Text(s) => serializer.serialize_str(s),
		}
	}
}

impl Default for FilterValue {
	fn default() -> Self {
		FilterValue::Text(String::new())
	}
}

impl FilterValue {
	/// The value a fresh condition on a column of this type starts with.
	pub fn default_for(column_type: ColumnType) -> Self {
		match column_type {
			ColumnType::String => FilterValue::Text(String::new()),
			ColumnType::Number => FilterValue::Number(0.0),
			ColumnType::Boolean => FilterValue::Text("true".to_string()),
		}
	}

	pub fn to_text(&self) -> String {
		match self {
			FilterValue::Number(n) => number_text(*n),
			FilterValue::Bool(b) => b.to_string(),
			FilterValue::Text(s) => s.clone(),
		}
	}

	pub fn to_number(&self) -> f64 {
		match self {
			FilterValue::Number(n) => *n,
			FilterValue::Bool(true) => 1.0,
			FilterValue::Bool(false) => 0.0,
			FilterValue::Text(s) => coerce_number(s),
		}
	}

	/// Strict boolean reading: only the exact text `true` is true.
	pub fn is_true_literal(&self) -> bool {
		self.to_text() == "true"
	}
}

impl From<&str> for FilterValue {
	fn from(s: &str) -> Self {
		FilterValue::Text(s.to_string())
	}
}

impl From<f64> for FilterValue {
	fn from(n: f64) -> Self {
		FilterValue::Number(n)
	}
}

impl From<bool> for FilterValue {
	fn from(b: bool) -> Self {
		FilterValue::Bool(b)
	}
}

/// How the conditions of one group combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
	#[default]
	#[serde(rename = "AND")]
	And,
	#[serde(rename = "OR")]
	Or,
}

impl Logic {
	pub fn as_str(&self) -> &'static str {
		match self {
			Logic::And => "AND",
			Logic::Or => "OR",
		}
	}
}

impl fmt::Display for Logic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single predicate over one record column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
	pub column: ColumnKey,
	pub operator: Operator,
	#[serde(default)]
	pub value: FilterValue,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compare_column: Option<ColumnKey>,
}

impl FilterCondition {
	pub fn new(column: ColumnKey, operator: Operator, value: impl Into<FilterValue>) -> Self {
		Self {
			column,
			operator,
			value: value.into(),
			compare_column: None,
		}
	}

	pub fn compare(column: ColumnKey, operator: Operator, compare_column: ColumnKey) -> Self {
		Self {
			column,
			operator,
			value: FilterValue::default_for(ColumnType::Number),
			compare_column: Some(compare_column),
		}
	}

	/// A fresh condition on `column` using the first operator legal for it.
	pub fn for_column(column: ColumnKey) -> Self {
		let column_type = column.column_type();
		let operator = operators_for(column_type)
			.first()
			.cloned()
			.unwrap_or(Operator::Equals);
		Self::new(column, operator, FilterValue::default_for(column_type))
	}

	/// Switches the condition to another column.
	///
	/// The operator and value are kept while they are still legal for the new
	/// column; otherwise the condition starts over from the column defaults.
	pub fn set_column(&mut self, column: ColumnKey) {
		if column == self.column {
			return;
		}
		let legal = operators_for(column.column_type()).contains(&self.operator);
		let self_compare = self.compare_column == Some(column);
		if !legal || self_compare || column.column_type() != self.column.column_type() {
			*self = Self::for_column(column);
		} else {
			self.column = column;
		}
	}

	/// Switches operator, picking or dropping a comparison column to match.
	pub fn set_operator(&mut self, operator: Operator) {
		if operator.is_column_compare() {
			if self.compare_column.is_none() {
				self.compare_column = numeric_columns().find(|c| *c != self.column);
			}
		} else {
			self.compare_column = None;
		}
		self.operator = operator;
	}
}

/// A set of conditions combined by one logic operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
	pub id: String,
	#[serde(default)]
	pub conditions: Vec<FilterCondition>,
	#[serde(default)]
	pub logic: Logic,
}

impl FilterGroup {
	pub fn new(id: impl Into<String>, logic: Logic) -> Self {
		Self {
			id: id.into(),
			conditions: Vec::new(),
			logic,
		}
	}

	pub fn with_condition(mut self, condition: FilterCondition) -> Self {
		self.conditions.push(condition);
		self
	}

	/// Appends the editor's starting condition, `department contains ""`.
	pub fn add_condition(&mut self) -> &mut FilterCondition {
		self.conditions.push(FilterCondition::new(
			ColumnKey::Department,
			Operator::Contains,
			"",
		));
		let last = self.conditions.len() - 1;
		&mut self.conditions[last]
	}

	pub fn remove_condition(&mut self, index: usize) -> Option<FilterCondition> {
		if index < self.conditions.len() {
			Some(self.conditions.remove(index))
		} else {
			None
		}
	}

	pub fn set_logic(&mut self, logic: Logic) {
		self.logic = logic;
	}
}

/// An ordered list of groups, all of which a record must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterConfiguration(pub Vec<FilterGroup>);

impl FilterConfiguration {
	pub fn new(groups: Vec<FilterGroup>) -> Self {
		Self(groups)
	}

	/// The configuration used when none is stored or after a reset: records
	/// whose pending days have reached their turnaround time.
	pub fn default_config() -> Self {
		Self(vec![FilterGroup::new(DEFAULT_GROUP_ID, Logic::And).with_condition(
			FilterCondition::compare(
				ColumnKey::PendingSince,
				Operator::ColumnGreaterEqual,
				ColumnKey::TatDays,
			),
		)])
	}

	pub fn groups(&self) -> &[FilterGroup] {
		&self.0
	}

	pub fn groups_mut(&mut self) -> &mut Vec<FilterGroup> {
		&mut self.0
	}

	pub fn into_groups(self) -> Vec<FilterGroup> {
		self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn group(&self, id: &str) -> Option<&FilterGroup> {
		self.0.iter().find(|g| g.id == id)
	}

	pub fn group_mut(&mut self, id: &str) -> Option<&mut FilterGroup> {
		self.0.iter_mut().find(|g| g.id == id)
	}

	/// Appends a new AND group holding one starting condition.
	pub fn add_group(&mut self) -> &mut FilterGroup {
		let id = self.next_group_id();
		let mut group = FilterGroup::new(id, Logic::And);
		group.add_condition();
		self.0.push(group);
		let last = self.0.len() - 1;
		&mut self.0[last]
	}

	/// Removes a group. The last remaining group cannot be removed.
	pub fn remove_group(&mut self, id: &str) -> bool {
		if self.0.len() <= 1 {
			return false;
		}
		let before = self.0.len();
		self.0.retain(|g| g.id != id);
		self.0.len() != before
	}

	fn next_group_id(&self) -> String {
		let mut n = self.0.len() + 1;
		loop {
			let id = format!("group-{n}");
			if self.group(&id).is_none() {
				return id;
			}
			n += 1;
		}
	}
}

impl From<Vec<FilterGroup>> for FilterConfiguration {
	fn from(groups: Vec<FilterGroup>) -> Self {
		Self(groups)
	}
}
