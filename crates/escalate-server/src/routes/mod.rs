// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod docs;
pub mod events;
pub mod filters;
pub mod health;
pub mod mail;
pub mod records;
pub mod uploads;
