// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the engine's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod activity;
pub mod adapter;
pub mod provider;
pub mod selector_state;
pub mod storage;

pub use activity::{ActivityLog, AI_GENERATE_ACTION};
pub use adapter::PluginAdapter;
pub use provider::ProviderAdapter;
pub use selector_state::SelectorStateStore;
pub use storage::UsageStore;
