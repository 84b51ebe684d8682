//! CLI command implementations.
//!
//! Each function owns one `Commands` variant: `cmd_list` (List),
//! `cmd_watch` (Watch), `cmd_update` (Update), `cmd_delete` (Delete).
//! They build the controller from config, run the operation, and render
//! operator-facing output; typed errors bubble up as human-readable
//! messages.

use std::time::Duration;

use anyhow::Result;
use chrono::TimeDelta;
use console::{Emoji, style};

use curbside::backend::HttpBackend;
use curbside::config::CurbsideConfig;
use curbside::dashboard::DashboardController;
use curbside::report::{Report, ReportStatus};
use curbside::store::ReportStore;
use curbside::watcher::DeadlineWatcher;

static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "[!]");

fn build_controller(config: &CurbsideConfig) -> DashboardController<HttpBackend> {
    let backend = HttpBackend::new(
        config.backend.base_url.clone(),
        config.backend.token.clone(),
    );
    DashboardController::new(backend, ReportStore::new())
}

pub async fn cmd_list(config: &CurbsideConfig) -> Result<()> {
    let controller = build_controller(config);
    let count = controller.load().await?;

    println!();
    print_report_table(&controller.store().all());
    println!();
    println!("{} report(s)", count);
    Ok(())
}

pub async fn cmd_watch(config: &CurbsideConfig, duration_secs: Option<u64>) -> Result<()> {
    let store = ReportStore::new();
    let backend = HttpBackend::new(
        config.backend.base_url.clone(),
        config.backend.token.clone(),
    );
    let controller = DashboardController::new(backend, store.clone());
    controller.load().await?;

    println!();
    print_report_table(&store.all());
    println!();
    println!(
        "Watching deadlines every {}s (grace period {}h). Ctrl-C to stop.",
        config.watcher.tick_secs, config.watcher.grace_hours
    );

    let handle = DeadlineWatcher::new(store.clone())
        .with_tick(Duration::from_secs(config.watcher.tick_secs))
        .with_grace(TimeDelta::hours(config.watcher.grace_hours))
        .spawn();

    let limit = duration_secs.map(Duration::from_secs);
    let started = tokio::time::Instant::now();
    let mut last = store.all();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let snapshot = store.all();
                if snapshot != last {
                    println!();
                    print_report_table(&snapshot);
                    last = snapshot;
                }
                if let Some(limit) = limit {
                    if started.elapsed() >= limit {
                        break;
                    }
                }
            }
        }
    }

    handle.stop();
    println!();
    println!("Watcher stopped.");
    Ok(())
}

pub async fn cmd_update(
    config: &CurbsideConfig,
    id: &str,
    status: ReportStatus,
    deadline: Option<&str>,
) -> Result<()> {
    let controller = build_controller(config);
    controller.load().await?;

    let updated = controller.commit_update(id, status, deadline).await?;
    println!(
        "{} Report {} is now {}",
        style("Updated.").green(),
        updated.id,
        styled_status(updated.status)
    );
    Ok(())
}

pub async fn cmd_delete(config: &CurbsideConfig, id: &str) -> Result<()> {
    let controller = build_controller(config);
    controller.load().await?;

    controller.delete_report(id).await?;
    println!("{} Report {} removed", style("Deleted.").green(), id);
    Ok(())
}

fn styled_status(status: ReportStatus) -> console::StyledObject<&'static str> {
    match status {
        ReportStatus::Pending => style(status.as_str()).yellow(),
        ReportStatus::Completed => style(status.as_str()).green(),
        ReportStatus::Failed => style(status.as_str()).red(),
    }
}

fn print_report_table(reports: &[Report]) {
    println!(
        "{:<10} {:<32} {:<12} Estimated completion",
        "ID", "Location", "Status"
    );
    println!(
        "{:<10} {:<32} {:<12} --------------------",
        "--------", "------------------------------", "----------"
    );
    for report in reports {
        let marker = if report.status == ReportStatus::Failed {
            format!(" {}", WARNING)
        } else {
            String::new()
        };
        println!(
            "{:<10} {:<32} {:<12} {}{}",
            report.id,
            report.address,
            styled_status(report.status),
            report.estimated_completion_time.as_deref().unwrap_or("-"),
            marker
        );
    }
}
