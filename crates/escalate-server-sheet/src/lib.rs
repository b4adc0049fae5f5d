// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reads escalation uploads.
//!
//! Excel workbooks (`.xlsx`, `.xls`) go through `calamine`; CSV through
//! `csv`. Only the first sheet is read. The first row must carry the nine
//! column headers; each further non-blank row becomes a [`NewRecord`].
//!
//! [`NewRecord`]: escalate_common_core::NewRecord

pub mod cell;
pub mod error;
pub mod format;
pub mod parse;

pub use error::{Result, SheetError};
pub use format::SheetFormat;
pub use parse::{filter_pending, parse_buffer, ParsedSheet};
