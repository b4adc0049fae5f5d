// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! At most one send in flight per record.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct InFlightSends {
	records: Arc<Mutex<HashSet<i64>>>,
}

impl InFlightSends {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claims `record_id`, or returns `None` if a send for it is running.
	/// The claim is released when the returned guard drops.
	pub fn claim(&self, record_id: i64) -> Option<SendClaim> {
		let mut records = self.records.lock().unwrap_or_else(|p| p.into_inner());
		if !records.insert(record_id) {
			return None;
		}
		Some(SendClaim {
			records: Arc::clone(&self.records),
			record_id,
		})
	}

	pub fn is_claimed(&self, record_id: i64) -> bool {
		self.records
			.lock()
			.map(|r| r.contains(&record_id))
			.unwrap_or(false)
	}
}

#[derive(Debug)]
pub struct SendClaim {
	records: Arc<Mutex<HashSet<i64>>>,
	record_id: i64,
}

impl Drop for SendClaim {
	fn drop(&mut self) {
		let mut records = self.records.lock().unwrap_or_else(|p| p.into_inner());
		records.remove(&self.record_id);
	}
}
