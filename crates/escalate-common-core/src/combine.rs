// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::evaluate::evaluate;
use crate::filter::{FilterConfiguration, FilterGroup, Logic};
use crate::record::Fields;

/// Whether a record satisfies a single group. Empty groups always match.
pub fn matches_group<R: Fields + ?Sized>(record: &R, group: &FilterGroup) -> bool {
	if group.conditions.is_empty() {
		return true;
	}
	let mut results = group.conditions.iter().map(|c| evaluate(record, c));
	match group.logic {
		Logic::And => results.all(|r| r),
		Logic::Or => results.any(|r| r),
	}
}

/// Whether a record satisfies every group.
pub fn matches<R: Fields + ?Sized>(record: &R, groups: &[FilterGroup]) -> bool {
	groups.iter().all(|group| matches_group(record, group))
}

/// Returns the records that satisfy `config`, preserving input order.
pub fn apply_filters<'a, R: Fields>(records: &'a [R], config: &FilterConfiguration) -> Vec<&'a R> {
	records
		.iter()
		.filter(|record| matches(*record, config.groups()))
		.collect()
}
