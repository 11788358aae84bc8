// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quizforge status` command implementation.
//!
//! Reports today's per-backend usage from the ledger and a user's remaining
//! daily allowance, along with backend cooldowns persisted by earlier runs.

use std::io::IsTerminal;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use colored::Colorize;
use quizforge_config::QuizforgeConfig;
use quizforge_core::{ActivityLog, CooldownEntry, QuizforgeError, UsageRecord, UsageStatus};
use quizforge_resilience::ModelSelector;
use quizforge_usage::{QuotaGuard, QuotaStatus};
use serde::Serialize;

use crate::app;

/// One configured or recorded backend as shown by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendRow {
    pub model: String,
    pub configured: bool,
    pub success_count: u32,
    pub failure_count: u32,
    /// `active`, `degraded`, or `unused` when nothing was recorded today.
    pub status: String,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub cooldown_secs: Option<u64>,
}

/// Full JSON status report.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub date: NaiveDate,
    pub user: String,
    pub quota: QuotaStatus,
    pub backends: Vec<BackendRow>,
}

/// Runs the `quizforge status` command.
pub async fn run_status(
    config: &QuizforgeConfig,
    user: &str,
    json: bool,
    plain: bool,
) -> Result<(), QuizforgeError> {
    let storage = app::open_storage(config).await?;
    let ledger = app::build_ledger(&storage, Arc::new(ModelSelector::new())).await?;
    let activity: Arc<dyn ActivityLog> = storage.clone();
    let quota = QuotaGuard::new(activity)
        .check(user, config.quota.daily_limit)
        .await?;

    let report = StatusReport {
        date: Local::now().date_naive(),
        user: user.to_string(),
        quota,
        backends: build_rows(
            &config.generation.models,
            ledger.today_report().await?,
            &ledger.cooldown_snapshot(),
        ),
    };

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| QuizforgeError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{out}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_report(&report, use_color));
    }
    Ok(())
}

/// Configured backends first, in rotation order, then any other backend
/// that has a record today.
fn build_rows(
    configured: &[String],
    records: Vec<UsageRecord>,
    cooldowns: &[CooldownEntry],
) -> Vec<BackendRow> {
    let cooldown_for = |model: &str| {
        cooldowns
            .iter()
            .find(|c| c.backend == model)
            .map(|c| c.remaining.as_secs())
    };

    let mut rows: Vec<BackendRow> = configured
        .iter()
        .map(|model| BackendRow {
            model: model.clone(),
            configured: true,
            success_count: 0,
            failure_count: 0,
            status: "unused".to_string(),
            last_failure_at: None,
            cooldown_secs: cooldown_for(model),
        })
        .collect();

    for record in records {
        let row = match rows.iter().position(|r| r.model == record.model_name) {
            Some(i) => &mut rows[i],
            None => {
                rows.push(BackendRow {
                    model: record.model_name.clone(),
                    configured: false,
                    success_count: 0,
                    failure_count: 0,
                    status: String::new(),
                    last_failure_at: None,
                    cooldown_secs: cooldown_for(&record.model_name),
                });
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };
        row.success_count = record.success_count;
        row.failure_count = record.failure_count;
        row.status = record.status.to_string();
        row.last_failure_at = record.last_failure_at;
    }
    rows
}

fn render_report(report: &StatusReport, use_color: bool) -> String {
    let mut lines = vec![
        String::new(),
        format!("  quizforge status ({})", report.date),
        format!("  {}", "-".repeat(35)),
    ];

    let quota = &report.quota;
    let allowance = format!("{}/{} remaining", quota.remaining, quota.limit);
    let allowance = match (use_color, quota.is_exhausted()) {
        (true, true) => allowance.red().to_string(),
        (true, false) => allowance.green().to_string(),
        (false, _) => allowance,
    };
    lines.push(format!("    User:     {} ({allowance})", report.user));
    lines.push(String::new());

    if report.backends.is_empty() {
        lines.push("    No backends configured.".to_string());
    }
    for row in &report.backends {
        let marker = status_marker(&row.status, use_color);
        let mut line = format!(
            "    {marker} {:<28} ok {:>3}  failed {:>3}",
            row.model, row.success_count, row.failure_count
        );
        if let Some(at) = row.last_failure_at {
            line.push_str(&format!(
                "  last failure {}",
                at.with_timezone(&Local).format("%H:%M:%S")
            ));
        }
        if let Some(secs) = row.cooldown_secs {
            line.push_str(&format!("  cooling down {secs}s"));
        }
        if !row.configured {
            line.push_str("  (not configured)");
        }
        lines.push(line);
    }
    lines.push(String::new());
    lines.join("\n") + "\n"
}

fn status_marker(status: &str, use_color: bool) -> String {
    let active = status == UsageStatus::Active.to_string();
    let degraded = status == UsageStatus::Degraded.to_string();
    if active {
        if use_color { "✓".green().to_string() } else { "[OK]  ".to_string() }
    } else if degraded {
        if use_color { "!".yellow().to_string() } else { "[WARN]".to_string() }
    } else if use_color {
        "-".dimmed().to_string()
    } else {
        "[--]  ".to_string()
    }
}
