// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::record::EscalationRecord;

/// A pre-filled escalation email the user reviews before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
	pub to: String,
	pub subject: String,
	pub body: String,
}

impl EmailDraft {
	pub fn for_record(record: &EscalationRecord) -> Self {
		let subject = format!(
			"Escalation Required: {} - {}",
			record.file_activity, record.department
		);
		let body = format!(
			"Dear {next},\n\
			\n\
			This is to bring to your attention that the following file/activity requires immediate escalation:\n\
			\n\
			File/Activity: {activity}\n\
			Department: {department}\n\
			Current Level: {current}\n\
			Pending Since: {pending} days\n\
			TAT: {tat} days\n\
			Next Level: {next}\n\
			Remarks: {remarks}\n\
			\n\
			The file has been pending for {pending} days, which exceeds the TAT of {tat} days.\n\
			\n\
			Please take necessary action at the earliest.\n\
			\n\
			Best regards,\n\
			System",
			next = record.next_level,
			activity = record.file_activity,
			department = record.department,
			current = record.current_level,
			pending = record.pending_since,
			tat = record.tat_days,
			remarks = record.remarks,
		);
		Self {
			to: record.escalation_email.clone(),
			subject,
			body,
		}
	}
}
