// ABOUTME: Library entry point for the Agua Firestore seeding and maintenance tools
// ABOUTME: Exposes the activity catalog, the document store abstraction and the maintenance jobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

#![deny(unsafe_code)]

//! # Agua Firestore
//!
//! Administrative tooling for the Firestore database behind the Agua
//! water-usage tracker.
//!
//! ## Architecture
//!
//! - **Catalog**: the built-in list of activity types and their water cost
//! - **Store**: the [`store::DocumentStore`] trait, implemented by the
//!   Firestore REST client and by an in-memory store
//! - **Jobs**: seeding, global consumption totals, and duplicate cleanup,
//!   each a plain async function over a `&dyn DocumentStore`
//! - **Bootstrap**: logging, configuration, and credential handling shared
//!   by the binaries in `src/bin/`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use agua_firestore::catalog;
//! use agua_firestore::seeder::{seed_activity_types, SeedMode};
//! use agua_firestore::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MemoryStore::new();
//!     let report = seed_activity_types(&store, &catalog::activity_types(), SeedMode::Append).await?;
//!     println!("inserted {}", report.inserted);
//!     Ok(())
//! }
//! ```

/// Startup helpers shared by the binaries
pub mod bootstrap;

/// Built-in activity type catalog
pub mod catalog;

/// Duplicate daily record cleanup
pub mod cleanup;

/// Environment-driven configuration
pub mod config;

/// Global water consumption totals
pub mod consumption;

/// Firestore REST integration
pub mod firestore;

/// Inspection and cleanup of `global_stats`
pub mod global_stats;

/// Tracing subscriber setup
pub mod logging;

/// Activity type seeding
pub mod seeder;

/// Document store abstraction and in-memory implementation
pub mod store;

pub use agua_core::{constants, errors, models};
