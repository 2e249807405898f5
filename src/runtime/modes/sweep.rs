//! One-shot sweep mode
//!
//! Runs a single reclamation pass against the configured store and exits.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::services::SweepReport;

pub async fn run_sweep(config: Arc<StaticConfig>) -> Result<SweepReport> {
    let startup = lifetime::startup::prepare_startup(&config).await?;
    let report = startup.sweeper.run_once().await?;

    print_report(&report, config.sweeper.ttl_days);
    Ok(report)
}

fn print_report(report: &SweepReport, ttl_days: u64) {
    println!(
        "{} ttl {} days, {} pages",
        "Sweep finished:".green().bold(),
        ttl_days,
        report.pages
    );
    println!("  scanned  {}", report.scanned);
    println!("  expired  {}", report.expired);
    println!("  deleted  {}", report.deleted.to_string().green());
    println!("  skipped  {}", report.skipped);
    if report.failed > 0 {
        println!("  failed   {}", report.failed.to_string().red().bold());
    } else {
        println!("  failed   0");
    }
}
