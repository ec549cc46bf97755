// ABOUTME: Removes the legacy all-time document from global_stats
// ABOUTME: Leaves only per-day documents so their sum is the real total
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::path::PathBuf;

use agua_firestore::bootstrap::{connect_or_exit, init_logging, load_config};
use agua_firestore::global_stats::cleanup_old_global;
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cleanup-old-global",
    about = "Delete global_stats/water_consumption and list the remaining documents"
)]
struct CleanupArgs {
    /// Service-account key file (defaults to serviceAccountKey.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CleanupArgs::parse();
    init_logging(args.verbose)?;

    let client = connect_or_exit(load_config(args.credentials)?)?;
    let overview = cleanup_old_global(&client).await?;
    info!(
        "{} documents remain, {} L in total",
        overview.documents.len(),
        overview.total_liters
    );
    Ok(())
}
