// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Search, quick filters and sorting for the pending-records table.
//!
//! These run after the rule-based filters and never touch stored state.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::record::EscalationRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailStatusFilter {
	#[default]
	All,
	Sent,
	Pending,
}

impl MailStatusFilter {
	fn accepts(&self, mail_sent: bool) -> bool {
		match self {
			MailStatusFilter::All => true,
			MailStatusFilter::Sent => mail_sent,
			MailStatusFilter::Pending => !mail_sent,
		}
	}
}

/// Columns the table can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
	Department,
	FileActivity,
	#[default]
	PendingSince,
	TatDays,
	EscalationEmail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	Asc,
	#[default]
	Desc,
}

impl SortDirection {
	pub fn flipped(self) -> Self {
		match self {
			SortDirection::Asc => SortDirection::Desc,
			SortDirection::Desc => SortDirection::Asc,
		}
	}
}

/// View state of the pending-records table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableQuery {
	pub search: Option<String>,
	/// Exact department to show; `None` or `"all"` shows every department.
	pub department: Option<String>,
	pub mail_status: MailStatusFilter,
	pub sort_field: SortField,
	pub sort_direction: SortDirection,
}

impl TableQuery {
	/// Clicking the active column flips direction; another column sorts
	/// ascending.
	pub fn toggle_sort(&mut self, field: SortField) {
		if self.sort_field == field {
			self.sort_direction = self.sort_direction.flipped();
		} else {
			self.sort_field = field;
			self.sort_direction = SortDirection::Asc;
		}
	}

	pub fn accepts(&self, record: &EscalationRecord) -> bool {
		self.matches_search(record)
			&& self.matches_department(record)
			&& self.mail_status.accepts(record.mail_sent)
	}

	fn matches_search(&self, record: &EscalationRecord) -> bool {
		let needle = match self.search.as_deref() {
			Some(s) if !s.is_empty() => s.to_lowercase(),
			_ => return true,
		};
		[
			&record.department,
			&record.file_activity,
			&record.current_level,
			&record.next_level,
			&record.escalation_email,
			&record.remarks,
		]
		.iter()
		.any(|field| field.to_lowercase().contains(&needle))
	}

	fn matches_department(&self, record: &EscalationRecord) -> bool {
		match self.department.as_deref() {
			None | Some("all") => true,
			Some(dept) => record.department == dept,
		}
	}

	fn compare(&self, a: &EscalationRecord, b: &EscalationRecord) -> Ordering {
		let ordering = match self.sort_field {
			SortField::PendingSince => a.pending_since.cmp(&b.pending_since),
			SortField::TatDays => a.tat_days.cmp(&b.tat_days),
			SortField::Department => cmp_text(&a.department, &b.department),
			SortField::FileActivity => cmp_text(&a.file_activity, &b.file_activity),
			SortField::EscalationEmail => cmp_text(&a.escalation_email, &b.escalation_email),
		};
		match self.sort_direction {
			SortDirection::Asc => ordering,
			SortDirection::Desc => ordering.reverse(),
		}
	}

	/// Filters and sorts. Ties keep their input order.
	pub fn apply<'a, I>(&self, records: I) -> Vec<&'a EscalationRecord>
	where
		I: IntoIterator<Item = &'a EscalationRecord>,
	{
		let mut rows: Vec<_> = records.into_iter().filter(|r| self.accepts(r)).collect();
		rows.sort_by(|a, b| self.compare(a, b));
		rows
	}
}

fn cmp_text(a: &str, b: &str) -> Ordering {
	a.to_lowercase().cmp(&b.to_lowercase())
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
	pub total: usize,
	pub pending: usize,
	pub sent: usize,
}

impl RecordStats {
	pub fn from_records<'a, I>(records: I) -> Self
	where
		I: IntoIterator<Item = &'a EscalationRecord>,
	{
		records.into_iter().fold(Self::default(), |mut stats, r| {
			stats.total += 1;
			if r.mail_sent {
				stats.sent += 1;
			} else {
				stats.pending += 1;
			}
			stats
		})
	}
}

/// Distinct department names in sorted order.
pub fn departments<'a, I>(records: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a EscalationRecord>,
{
	records
		.into_iter()
		.map(|r| r.department.clone())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}
