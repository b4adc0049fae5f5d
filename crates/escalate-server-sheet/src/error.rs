// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
	#[error("Unsupported file type: {0}")]
	UnsupportedFormat(String),

	#[error("Failed to read workbook: {0}")]
	Workbook(String),

	#[error("Failed to read CSV: {0}")]
	Csv(#[from] csv::Error),

	#[error("No sheets found in the file")]
	NoSheets,

	#[error("File must contain at least a header row and one data row")]
	TooFewRows,

	#[error("Missing required columns: {}", .0.join(", "))]
	MissingColumns(Vec<String>),

	#[error("Row {row}: {message}")]
	Row { row: usize, message: String },
}

impl SheetError {
	/// Whether the upload itself is at fault, as opposed to the file being
	/// unreadable.
	pub fn is_validation(&self) -> bool {
		matches!(
			self,
			SheetError::UnsupportedFormat(_)
				| SheetError::TooFewRows
				| SheetError::MissingColumns(_)
				| SheetError::Row { .. }
		)
	}
}

pub type Result<T> = std::result::Result<T, SheetError>;
