// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};
use escalate_common_core::{is_valid_email, ColumnKey, NewRecord};

use crate::cell::Cell;
use crate::error::{Result, SheetError};
use crate::format::SheetFormat;

/// Rows read from the first sheet of an upload, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
	pub rows: Vec<NewRecord>,
}

impl ParsedSheet {
	pub fn total_rows(&self) -> usize {
		self.rows.len()
	}

	/// Rows whose pending days exceed their turnaround time.
	pub fn pending(&self) -> Vec<NewRecord> {
		self.rows.iter().filter(|r| r.is_overdue()).cloned().collect()
	}

	pub fn into_pending(self) -> Vec<NewRecord> {
		filter_pending(self.rows)
	}
}

pub fn filter_pending(rows: Vec<NewRecord>) -> Vec<NewRecord> {
	rows.into_iter().filter(NewRecord::is_overdue).collect()
}

/// Header row plus data rows. `header_row` is the 1-based row number of
/// the header as the user sees it in a spreadsheet.
struct Grid {
	header_row: usize,
	rows: Vec<Vec<Cell>>,
}

/// Parses an upload into records.
///
/// # Errors
/// Fails on unreadable files, missing required columns, and the first row
/// with a missing required field, a malformed email, or a bad day count.
#[tracing::instrument(skip(bytes), fields(size = bytes.len()))]
pub fn parse_buffer(bytes: &[u8], format: SheetFormat) -> Result<ParsedSheet> {
	let grid = if format.is_workbook() {
		read_workbook(bytes)?
	} else {
		read_csv(bytes)?
	};
	let sheet = parse_grid(grid)?;
	tracing::debug!(rows = sheet.total_rows(), %format, "sheet parsed");
	Ok(sheet)
}

fn read_workbook(bytes: &[u8]) -> Result<Grid> {
	let mut workbook =
		open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| SheetError::Workbook(e.to_string()))?;
	let range = workbook
		.worksheet_range_at(0)
		.ok_or(SheetError::NoSheets)?
		.map_err(|e| SheetError::Workbook(e.to_string()))?;

	let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
	let rows = range
		.rows()
		.map(|row| row.iter().map(Cell::from).collect())
		.collect();
	Ok(Grid { header_row, rows })
}

fn read_csv(bytes: &[u8]) -> Result<Grid> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(bytes);

	let mut rows = Vec::new();
	for record in reader.records() {
		let record = record?;
		rows.push(record.iter().map(Cell::from).collect());
	}
	Ok(Grid { header_row: 1, rows })
}

fn parse_grid(grid: Grid) -> Result<ParsedSheet> {
	let Some((header, data)) = grid.rows.split_first() else {
		return Err(SheetError::TooFewRows);
	};
	if data.is_empty() {
		return Err(SheetError::TooFewRows);
	}

	let columns = map_columns(header)?;
	let mut rows = Vec::with_capacity(data.len());
	for (index, cells) in data.iter().enumerate() {
		if cells.iter().all(Cell::is_blank) {
			continue;
		}
		let row = grid.header_row + 1 + index;
		rows.push(parse_row(&columns, cells).map_err(|message| SheetError::Row { row, message })?);
	}

	if rows.is_empty() {
		return Err(SheetError::TooFewRows);
	}
	Ok(ParsedSheet { rows })
}

/// Index of each column's header, matched trimmed and case-insensitively.
struct ColumnMap([usize; ColumnKey::ALL.len()]);

impl ColumnMap {
	fn cell<'a>(&self, cells: &'a [Cell], key: ColumnKey) -> &'a Cell {
		cells.get(self.0[key as usize]).unwrap_or(&Cell::Empty)
	}
}

fn map_columns(header: &[Cell]) -> Result<ColumnMap> {
	let names: Vec<String> = header
		.iter()
		.map(|c| c.text().trim_start_matches('\u{feff}').trim().to_lowercase())
		.collect();

	let mut indexes = [0usize; ColumnKey::ALL.len()];
	let mut missing = Vec::new();
	for key in ColumnKey::ALL {
		let label = key.label().to_lowercase();
		match names.iter().position(|name| *name == label) {
			Some(index) => indexes[key as usize] = index,
			None => missing.push(key.label().to_string()),
		}
	}

	if missing.is_empty() {
		Ok(ColumnMap(indexes))
	} else {
		Err(SheetError::MissingColumns(missing))
	}
}

fn parse_row(columns: &ColumnMap, cells: &[Cell]) -> std::result::Result<NewRecord, String> {
	let text = |key| columns.cell(cells, key).text();
	let days = |key: ColumnKey| {
		columns
			.cell(cells, key)
			.day_count()
			.map_err(|e| format!("{}: {e}", key.label()))
	};

	let record = NewRecord {
		department: text(ColumnKey::Department),
		file_activity: text(ColumnKey::FileActivity),
		current_level: text(ColumnKey::CurrentLevel),
		pending_since: days(ColumnKey::PendingSince)?,
		tat_days: days(ColumnKey::TatDays)?,
		next_level: text(ColumnKey::NextLevel),
		escalation_email: text(ColumnKey::EscalationEmail),
		remarks: text(ColumnKey::Remarks),
		mail_sent: columns.cell(cells, ColumnKey::MailSent).flag(),
	};

	if record.department.is_empty() || record.file_activity.is_empty() || record.escalation_email.is_empty() {
		return Err("Missing required data in Department, File/Activity, or Escalation Email".to_string());
	}
	if !is_valid_email(&record.escalation_email) {
		return Err(format!("Invalid email format: {}", record.escalation_email));
	}
	Ok(record)
}
