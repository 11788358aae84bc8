// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quizforge integration tests.
//!
//! Provides mock adapters and canned model outputs for fast, deterministic,
//! CI-runnable tests without network access or a database file.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted provider with per-backend replies
//! - [`MemoryUsageStore`] / [`FailingUsageStore`] - usage ledger stand-ins
//! - [`MemoryActivityLog`] - activity log stand-in
//! - [`MemorySelectorState`] - persisted selector state stand-in
//! - [`fixtures`] - quiz JSON documents, valid and malformed

pub mod fixtures;
pub mod memory_stores;
pub mod mock_provider;

pub use memory_stores::{
    ActivityEntry, FailingUsageStore, MemoryActivityLog, MemorySelectorState, MemoryUsageStore,
};
pub use mock_provider::{MockProvider, MockReply};
