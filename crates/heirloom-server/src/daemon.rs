//! The daemon loop — periodically evaluates every owner's countdown and logs
//! threshold warnings.
//!
//! Observe-only: the daemon reads persisted engine state and never mutates
//! it. There is no scheduler inside the engine — availability derives purely
//! from comparing stored timestamps against wall-clock now, here at each
//! check cycle.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use heirloom_engine::{EngineState, Wallet};
use heirloom_store::StateFile;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DAY_SECS: u64 = 86_400;

/// Run the daemon loop. Blocks forever (until shutdown signal).
pub async fn run(config: ServerConfig) -> Result<()> {
    log::info!("Heirloom server starting…");
    log::info!("  Data dir:   {}", config.server.data_dir.display());
    log::info!(
        "  Interval:   {} seconds ({:.1} hours)",
        config.server.check_interval_secs,
        config.server.check_interval_secs as f64 / 3600.0
    );
    log::info!(
        "  Thresholds: {:?} days",
        config.monitor.warning_threshold_days
    );

    // Ensure data directory exists
    std::fs::create_dir_all(&config.server.data_dir).with_context(|| {
        format!(
            "Failed to create data dir: {}",
            config.server.data_dir.display()
        )
    })?;

    let interval = Duration::from_secs(config.server.check_interval_secs);

    // Run first check immediately, then loop
    let mut first = true;
    loop {
        if !first {
            log::info!(
                "Sleeping {} seconds until next check…",
                config.server.check_interval_secs
            );
            tokio::time::sleep(interval).await;
        }
        first = false;

        match run_check_cycle(&config) {
            Ok(()) => log::info!("Check cycle completed successfully."),
            Err(e) => log::error!("Check cycle failed: {:#}", e),
        }
    }
}

/// Execute a single check cycle: load state, evaluate countdowns, log.
pub fn run_check_cycle(config: &ServerConfig) -> Result<()> {
    log::info!("Starting check cycle…");

    let state = StateFile::new(config.state_path())
        .load()
        .context("Failed to load engine state")?;

    let now = unix_now()?;
    let report = evaluate_owners(&state, now, &config.monitor.warning_threshold_days);

    for line in &report.lines {
        match line.severity {
            Severity::Info => log::info!("{}", line.message),
            Severity::Warn => log::warn!("{}", line.message),
        }
    }

    log::info!(
        "Owners: {}  |  available: {}  |  paused: {}  |  near deadline: {}",
        report.total,
        report.available,
        report.paused,
        report.warned
    );

    Ok(())
}

/// One log line from the evaluation, with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub owner: Wallet,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
}

/// Summary of one check cycle over all owners.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub total: usize,
    pub available: usize,
    pub paused: usize,
    pub warned: usize,
    pub lines: Vec<ReportLine>,
}

/// Pure evaluation of every owner's countdown at `now`.
pub fn evaluate_owners(state: &EngineState, now: u64, threshold_days: &[u32]) -> CycleReport {
    let mut report = CycleReport::default();

    // Stable order for logs
    let mut owners: Vec<&Wallet> = state.owners().collect();
    owners.sort();

    for owner in owners {
        report.total += 1;
        let Some(account) = state.account(owner) else {
            continue;
        };

        let line = match account.config.time_until_available(now) {
            None => {
                report.paused += 1;
                ReportLine {
                    owner: owner.clone(),
                    severity: Severity::Info,
                    message: format!("[{}] paused — countdown held indefinitely", owner),
                }
            }
            Some(0) => {
                report.available += 1;
                ReportLine {
                    owner: owner.clone(),
                    severity: Severity::Warn,
                    message: format!("[{}] inheritance AVAILABLE — heirs may claim", owner),
                }
            }
            Some(remaining) => {
                // Smallest threshold the countdown has already dropped below.
                let crossed = threshold_days
                    .iter()
                    .copied()
                    .filter(|&d| remaining <= u64::from(d) * DAY_SECS)
                    .min();
                match crossed {
                    Some(days) => {
                        report.warned += 1;
                        ReportLine {
                            owner: owner.clone(),
                            severity: Severity::Warn,
                            message: format!(
                                "[{}] countdown below {} day(s): {:.1} days remaining",
                                owner,
                                days,
                                remaining as f64 / DAY_SECS as f64
                            ),
                        }
                    }
                    None => ReportLine {
                        owner: owner.clone(),
                        severity: Severity::Info,
                        message: format!(
                            "[{}] healthy: {:.1} days remaining",
                            owner,
                            remaining as f64 / DAY_SECS as f64
                        ),
                    },
                }
            }
        };
        report.lines.push(line);
    }

    report
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock before unix epoch")?
        .as_secs())
}
