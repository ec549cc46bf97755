// ABOUTME: Lists the documents in global_stats with their totals
// ABOUTME: Read-only check of the aggregated consumption figures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::path::PathBuf;

use agua_firestore::bootstrap::{connect_or_exit, init_logging, load_config};
use agua_firestore::global_stats::check_global_stats;
use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "check-global-stats",
    about = "List global_stats documents and the sum of their totalLiters"
)]
struct CheckArgs {
    /// Service-account key file (defaults to serviceAccountKey.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CheckArgs::parse();
    init_logging(args.verbose)?;

    let client = connect_or_exit(load_config(args.credentials)?)?;
    check_global_stats(&client).await?;
    Ok(())
}
