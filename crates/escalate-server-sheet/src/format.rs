// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use crate::error::SheetError;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_CONTENT_TYPE: &str = "application/vnd.ms-excel";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
	Xlsx,
	Xls,
	Csv,
}

impl SheetFormat {
	/// Maps an upload's declared MIME type. Parameters such as `charset`
	/// are ignored.
	pub fn from_content_type(content_type: &str) -> Result<Self, SheetError> {
		let essence = content_type
			.split(';')
			.next()
			.unwrap_or_default()
			.trim()
			.to_ascii_lowercase();
		match essence.as_str() {
			XLSX_CONTENT_TYPE => Ok(SheetFormat::Xlsx),
			XLS_CONTENT_TYPE => Ok(SheetFormat::Xls),
			CSV_CONTENT_TYPE => Ok(SheetFormat::Csv),
			_ => Err(SheetError::UnsupportedFormat(content_type.to_string())),
		}
	}

	pub fn content_type(&self) -> &'static str {
		match self {
			SheetFormat::Xlsx => XLSX_CONTENT_TYPE,
			SheetFormat::Xls => XLS_CONTENT_TYPE,
			SheetFormat::Csv => CSV_CONTENT_TYPE,
		}
	}

	pub fn is_workbook(&self) -> bool {
		!matches!(self, SheetFormat::Csv)
	}
}

impl fmt::Display for SheetFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SheetFormat::Xlsx => "xlsx",
			SheetFormat::Xls => "xls",
			SheetFormat::Csv => "csv",
		};
		f.write_str(name)
	}
}
