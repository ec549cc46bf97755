// ABOUTME: Activity type seeding utility for the Agua Firestore database
// ABOUTME: Inserts the built-in catalog into the activity_types collection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Activity type seeder.
//!
//! Requires a service-account key (`serviceAccountKey.json` in the working
//! directory by default). Without it the tool prints setup guidance and exits
//! with status 1 before writing anything.
//!
//! Usage:
//! ```bash
//! # Seed the catalog (appends; re-running duplicates every entry)
//! cargo run --bin seed-activity-types
//!
//! # Overwrite entries that already exist by name
//! cargo run --bin seed-activity-types -- --upsert
//!
//! # Show what would be written, no credentials needed
//! cargo run --bin seed-activity-types -- --dry-run
//!
//! # Print the catalog, collection layout and setup steps
//! cargo run --bin seed-activity-types -- --print-schema
//! ```

use std::path::PathBuf;

use agua_firestore::bootstrap::{connect_or_exit, init_logging, load_config};
use agua_firestore::catalog;
use agua_firestore::seeder::{seed_activity_types, SeedMode};
use agua_firestore::store::{DocumentStore, MemoryStore};
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-activity-types",
    about = "Agua Activity Type Seeder",
    long_about = "Insert the built-in water-usage activity catalog into the Firestore activity_types collection"
)]
struct SeedArgs {
    /// Service-account key file (defaults to serviceAccountKey.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Overwrite documents whose name already exists instead of appending
    #[arg(long)]
    upsert: bool,

    /// Seed an in-memory store instead of Firestore
    #[arg(long)]
    dry_run: bool,

    /// Print the catalog, collection layout and setup steps, then exit
    #[arg(long)]
    print_schema: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    if args.print_schema {
        print!("{}", catalog::reference_sheet());
        return Ok(());
    }

    init_logging(args.verbose)?;
    info!("=== Agua Activity Type Seeder ===");

    let mode = if args.upsert {
        SeedMode::UpsertByName
    } else {
        SeedMode::Append
    };
    let activity_types = catalog::activity_types();

    let report = if args.dry_run {
        let store = MemoryStore::new();
        let report = seed_activity_types(&store, &activity_types, mode).await?;
        for call in store.add_calls().await {
            info!("would add {}/{}", call.collection_path, call.document_id);
        }
        report
    } else {
        let config = load_config(args.credentials)?;
        let client = connect_or_exit(config)?;
        let store: &dyn DocumentStore = &client;
        seed_activity_types(store, &activity_types, mode).await?
    };

    info!(
        "Done: {} activity types written ({} new, {} updated)",
        report.written(),
        report.inserted,
        report.updated
    );
    Ok(())
}
