// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Escalate.
//!
//! This crate holds everything about escalation records that does not touch
//! I/O: the column schema registry, the filter configuration model, the
//! condition evaluator and group combinator, the validation gate for filter
//! configurations, and the table/draft helpers used by the HTTP surface.
//!
//! # Example
//!
//! ```
//! use escalate_common_core::{apply_filters, FilterConfiguration, NewRecord};
//!
//! let rows = vec![NewRecord {
//!     department: "Finance".into(),
//!     file_activity: "Vendor payment".into(),
//!     current_level: "Clerk".into(),
//!     pending_since: 10,
//!     tat_days: 5,
//!     next_level: "Director".into(),
//!     escalation_email: "director@example.com".into(),
//!     remarks: String::new(),
//!     mail_sent: false,
//! }];
//!
//! let visible = apply_filters(&rows, &FilterConfiguration::default_config());
//! assert_eq!(visible.len(), 1);
//! ```

pub mod combine;
pub mod draft;
pub mod error;
pub mod evaluate;
pub mod filter;
pub mod operator;
pub mod record;
pub mod schema;
pub mod table;
pub mod validate;

pub use combine::{apply_filters, matches, matches_group};
pub use draft::EmailDraft;
pub use error::ValidationError;
pub use evaluate::evaluate;
pub use filter::{
	FilterCondition, FilterConfiguration, FilterGroup, FilterValue, Logic, DEFAULT_GROUP_ID,
};
pub use operator::{Operator, Relation};
pub use record::{
	coerce_number, is_valid_email, number_text, EscalationRecord, FieldValue, Fields, NewRecord,
};
pub use schema::{
	column_type, is_operator_allowed, numeric_columns, operators_for, ColumnDescriptor, ColumnKey,
	ColumnType, COLUMNS,
};
pub use table::{departments, MailStatusFilter, RecordStats, SortDirection, SortField, TableQuery};
pub use validate::{
	check_condition, parse_logic, validate_condition, validate_configuration, validate_groups,
	RawFilterCondition, RawFilterGroup,
};
