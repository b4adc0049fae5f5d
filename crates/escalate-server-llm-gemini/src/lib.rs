// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gemini-backed translation of plain-language requests into filters.
//!
//! [`GeminiClient`] speaks the `generateContent` REST API. [`FilterTranslator`]
//! builds the column-aware prompt, calls any [`TextGenerator`], and runs the
//! reply through the filter validation gate before returning it.
//!
//! # Example
//!
//! ```no_run
//! use escalate_server_llm_gemini::FilterTranslator;
//!
//! # async fn example(config: escalate_server_config::LlmConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let translator = FilterTranslator::from_config(&config)?;
//! let filters = translator.translate("overdue items in finance").await?;
//! println!("{} groups", filters.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod testing;
pub mod translate;
pub mod types;

pub use client::{GeminiClient, TextGenerator};
pub use error::{LlmError, Result, TranslationError};
pub use prompt::{build_prompt, clean_response};
pub use translate::{parse_filters, FilterTranslator};
