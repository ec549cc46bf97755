// ABOUTME: Merges duplicate daily records that share a dateKey
// ABOUTME: Keeps the first record per day and recomputes its totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Duplicate daily record cleanup.
//!
//! Usage:
//! ```bash
//! cargo run --bin cleanup-duplicates
//! cargo run --bin cleanup-duplicates -- --credentials ./keys/agua.json -v
//! ```

use std::path::PathBuf;

use agua_firestore::bootstrap::{connect_or_exit, init_logging, load_config};
use agua_firestore::cleanup::cleanup_duplicate_records;
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cleanup-duplicates",
    about = "Agua Duplicate Record Cleanup",
    long_about = "Fold duplicate users/{userId}/daily_records documents for the same day into one"
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
    let report = cleanup_duplicate_records(&client).await?;
    info!(
        "Cleanup finished: {} users, {} duplicate days, {} records deleted, {} activities moved",
        report.users_scanned, report.duplicate_groups, report.records_deleted, report.activities_moved
    );
    Ok(())
}
