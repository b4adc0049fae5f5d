// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Format-independent cell values and their coercions.

use calamine::Data;
use escalate_common_core::{coerce_number, number_text};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
	Empty,
	Text(String),
	Number(f64),
	Bool(bool),
}

impl Cell {
	pub fn is_blank(&self) -> bool {
		match self {
			Cell::Empty => true,
			Cell::Text(s) => s.trim().is_empty(),
			_ => false,
		}
	}

	/// Trimmed text form. Numbers print without a trailing `.0`.
	pub fn text(&self) -> String {
		match self {
			Cell::Empty => String::new(),
			Cell::Text(s) => s.trim().to_string(),
			Cell::Number(n) => number_text(*n),
			Cell::Bool(b) => b.to_string(),
		}
	}

	/// A whole, non-negative day count.
	pub fn day_count(&self) -> Result<u32, String> {
		let n = match self {
			Cell::Empty => return Err("Value is required".to_string()),
			Cell::Text(s) if s.is_empty() => return Err("Value is required".to_string()),
			Cell::Text(s) => coerce_number(s),
			Cell::Number(n) => *n,
			Cell::Bool(b) => f64::from(u8::from(*b)),
		};
		if n.is_nan() || n < 0.0 {
			return Err(format!("Must be a non-negative number, got: {}", self.text()));
		}
		let floored = n.floor();
		if floored > f64::from(u32::MAX) {
			return Err(format!("Value is too large: {}", self.text()));
		}
		Ok(floored as u32)
	}

	/// Mail status: `true`, `yes`, `1` or `sent` in any case, or any positive
	/// number.
	pub fn flag(&self) -> bool {
		match self {
			Cell::Bool(b) => *b,
			Cell::Number(n) => *n > 0.0,
			Cell::Text(s) => matches!(
				s.trim().to_ascii_lowercase().as_str(),
				"true" | "yes" | "1" | "sent"
			),
			Cell::Empty => false,
		}
	}
}

impl From<&Data> for Cell {
	fn from(data: &Data) -> Self {
		match data {
			Data::Empty => Cell::Empty,
			Data::String(s) => Cell::Text(s.clone()),
			Data::Float(f) => Cell::Number(*f),
			Data::Int(i) => Cell::Number(*i as f64),
			Data::Bool(b) => Cell::Bool(*b),
			other => Cell::Text(other.to_string()),
		}
	}
}

impl From<&str> for Cell {
	fn from(field: &str) -> Self {
		if field.is_empty() {
			Cell::Empty
		} else {
			Cell::Text(field.to_string())
		}
	}
}
