// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Change notifications for committed store writes.
//!
//! Every repository write publishes one [`ChangeEvent`] after its
//! transaction commits. Subscribers (the dataset provider, SSE clients)
//! re-read the store on receipt.
//!
//! # Events
//!
//! - `records.replaced` - a new upload replaced the stored record set
//! - `records.cleared` - records (and possibly everything else) were cleared
//! - `record.mail_sent` - one record's mail flag changed
//! - `filters.updated` - the filter configuration was saved or reset
//! - `filters.cleared` - the filter configuration was deleted

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ChangeEvent {
	#[serde(rename = "records.replaced")]
	RecordsReplaced(RecordsReplacedData),

	#[serde(rename = "records.cleared")]
	RecordsCleared(ClearedData),

	#[serde(rename = "record.mail_sent")]
	MailSent(MailSentData),

	#[serde(rename = "filters.updated")]
	FiltersUpdated(FiltersUpdatedData),

	#[serde(rename = "filters.cleared")]
	FiltersCleared(ClearedData),
}

impl ChangeEvent {
	/// Returns the event type name as a string.
	pub fn event_type(&self) -> &'static str {
		match self {
			ChangeEvent::RecordsReplaced(_) => "records.replaced",
			ChangeEvent::RecordsCleared(_) => "records.cleared",
			ChangeEvent::MailSent(_) => "record.mail_sent",
			ChangeEvent::FiltersUpdated(_) => "filters.updated",
			ChangeEvent::FiltersCleared(_) => "filters.cleared",
		}
	}

	/// Whether subscribers holding a record snapshot must re-read it.
	pub fn affects_records(&self) -> bool {
		matches!(
			self,
			ChangeEvent::RecordsReplaced(_) | ChangeEvent::RecordsCleared(_) | ChangeEvent::MailSent(_)
		)
	}

	pub fn records_replaced(upload_id: i64, count: usize) -> Self {
		ChangeEvent::RecordsReplaced(RecordsReplacedData {
			upload_id,
			count,
			timestamp: Utc::now(),
		})
	}

	pub fn records_cleared() -> Self {
		ChangeEvent::RecordsCleared(ClearedData {
			timestamp: Utc::now(),
		})
	}

	pub fn mail_sent(record_id: i64, mail_sent: bool) -> Self {
		ChangeEvent::MailSent(MailSentData {
			record_id,
			mail_sent,
			timestamp: Utc::now(),
		})
	}

	pub fn filters_updated(updated_at: DateTime<Utc>) -> Self {
		ChangeEvent::FiltersUpdated(FiltersUpdatedData { updated_at })
	}

	pub fn filters_cleared() -> Self {
		ChangeEvent::FiltersCleared(ClearedData {
			timestamp: Utc::now(),
		})
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordsReplacedData {
	pub upload_id: i64,
	pub count: usize,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MailSentData {
	pub record_id: i64,
	pub mail_sent: bool,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FiltersUpdatedData {
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClearedData {
	pub timestamp: DateTime<Utc>,
}

/// Fan-out of [`ChangeEvent`]s to any number of subscribers.
///
/// Cloning shares the underlying channel and the version counter.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
	sender: broadcast::Sender<ChangeEvent>,
	version: Arc<AtomicU64>,
}

impl ChangeNotifier {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity.max(1));
		Self {
			sender,
			version: Arc::new(AtomicU64::new(0)),
		}
	}

	/// Number of events published so far. Increases before the event is
	/// sent, so a reader that sees version `n` also sees the write behind it.
	pub fn version(&self) -> u64 {
		self.version.load(Ordering::SeqCst)
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
		self.sender.subscribe()
	}

	pub fn receiver_count(&self) -> usize {
		self.sender.receiver_count()
	}

	/// Publishes an event. Having no subscribers is not an error.
	pub fn publish(&self, event: ChangeEvent) {
		let event_type = event.event_type();
		let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
		match self.sender.send(event) {
			Ok(receivers) => tracing::debug!(event_type, version, receivers, "change event published"),
			Err(_) => tracing::trace!(event_type, "no subscribers for change event"),
		}
	}
}

impl Default for ChangeNotifier {
	fn default() -> Self {
		Self::new(DEFAULT_CHANNEL_CAPACITY)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_with_event_tag() {
		let json = serde_json::to_value(ChangeEvent::mail_sent(7, true)).unwrap();
		assert_eq!(json["event"], "record.mail_sent");
		assert_eq!(json["data"]["recordId"], 7);
		assert_eq!(json["data"]["mailSent"], true);
	}

	#[test]
	fn event_type_matches_serde_tag() {
		let events = [
			ChangeEvent::records_replaced(1, 3),
			ChangeEvent::records_cleared(),
			ChangeEvent::mail_sent(1, true),
			ChangeEvent::filters_updated(Utc::now()),
			ChangeEvent::filters_cleared(),
		];
		for event in events {
			let json = serde_json::to_value(&event).unwrap();
			assert_eq!(json["event"], event.event_type());
		}
	}

	#[test]
	fn record_events_are_flagged() {
		assert!(ChangeEvent::records_cleared().affects_records());
		assert!(ChangeEvent::mail_sent(1, true).affects_records());
		assert!(!ChangeEvent::filters_cleared().affects_records());
	}

	#[tokio::test]
	async fn publish_reaches_every_subscriber() {
		let notifier = ChangeNotifier::default();
		let mut a = notifier.subscribe();
		let mut b = notifier.clone().subscribe();
		notifier.publish(ChangeEvent::records_cleared());
		assert_eq!(a.recv().await.unwrap().event_type(), "records.cleared");
		assert_eq!(b.recv().await.unwrap().event_type(), "records.cleared");
	}

	#[test]
	fn publish_without_subscribers_is_silent() {
		let notifier = ChangeNotifier::default();
		assert_eq!(notifier.receiver_count(), 0);
		notifier.publish(ChangeEvent::filters_cleared());
	}

	#[test]
	fn version_counts_publishes_across_clones() {
		let notifier = ChangeNotifier::default();
		let other = notifier.clone();
		assert_eq!(notifier.version(), 0);
		notifier.publish(ChangeEvent::records_cleared());
		other.publish(ChangeEvent::filters_cleared());
		assert_eq!(notifier.version(), 2);
		assert_eq!(other.version(), 2);
	}
}
