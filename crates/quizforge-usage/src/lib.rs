// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage accounting for the Quizforge engine.
//!
//! This crate provides:
//! - **Usage ledger**: best-effort daily success/failure counters per backend,
//!   plus the operator view of backend cooldowns
//! - **Quota guard**: per-user daily generation allowance read from the activity log

pub mod ledger;
pub mod quota;

pub use ledger::UsageLedger;
pub use quota::{QuotaGuard, QuotaStatus, local_midnight_utc};
