// ABOUTME: Configuration module for the Firestore tooling
// ABOUTME: Environment-driven settings with command-line overrides applied by the binaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Configuration for the seeding and maintenance binaries.
//!
//! Configuration is environment-only; the binaries layer their `clap`
//! flags on top. With nothing set, the tools read `serviceAccountKey.json`
//! from the working directory and talk to the project's `(default)`
//! database.

/// Firestore connection settings
pub mod firestore;

pub use firestore::FirestoreConfig;
