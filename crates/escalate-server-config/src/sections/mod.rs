// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod database;
mod http;
mod limits;
mod llm;
mod logging;
mod smtp;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use limits::{RateLimitConfig, RateLimitConfigLayer, UploadConfig, UploadConfigLayer};
pub use llm::{LlmConfig, LlmConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use smtp::{SmtpConfig, SmtpConfigLayer, TlsMode};
