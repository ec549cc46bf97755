// ABOUTME: Recomputes global water consumption from every user's activities
// ABOUTME: Writes the all-time total or a single day's total into global_stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Global consumption calculator.
//!
//! Usage:
//! ```bash
//! # All-time total into global_stats/water_consumption
//! cargo run --bin calculate-global-consumption
//!
//! # Today's total into global_stats/{YYYY-MM-DD}
//! cargo run --bin calculate-global-consumption -- --daily
//!
//! # A specific day
//! cargo run --bin calculate-global-consumption -- --daily --date 2025-12-09
//! ```

use std::path::PathBuf;

use agua_firestore::bootstrap::{connect_or_exit, init_logging, load_config};
use agua_firestore::consumption::{calculate_daily_consumption, calculate_global_consumption};
use agua_firestore::models::parse_date_key;
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "calculate-global-consumption",
    about = "Agua Global Consumption Calculator",
    long_about = "Sum litersUsed across all users and store the result in the global_stats collection"
)]
struct ConsumptionArgs {
    /// Service-account key file (defaults to serviceAccountKey.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Compute a single day's total instead of the all-time total
    #[arg(long)]
    daily: bool,

    /// Day to compute with --daily, as YYYY-MM-DD (defaults to today)
    #[arg(long, requires = "daily")]
    date: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ConsumptionArgs::parse();
    init_logging(args.verbose)?;
    info!("=== Agua Global Consumption ===");

    let date = args.date.as_deref().map(parse_date_key).transpose()?;
    let client = connect_or_exit(load_config(args.credentials)?)?;

    let totals = if args.daily {
        let day = date.unwrap_or_else(|| Local::now().date_naive());
        calculate_daily_consumption(&client, day).await?
    } else {
        calculate_global_consumption(&client).await?
    };

    info!(
        "Done: {} L from {} activities across {} users",
        totals.total_liters, totals.total_activities, totals.users_count
    );
    Ok(())
}
