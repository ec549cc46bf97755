// ABOUTME: Core types and constants for the Agua water-usage Firestore tooling
// ABOUTME: Foundation crate with error handling, document models, and collection layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

#![deny(unsafe_code)]

//! # Agua Core
//!
//! Foundation crate shared by the seeding and maintenance binaries. It changes
//! rarely and carries no I/O.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: collection names, field names, and path builders
//! - **models**: `ActivityType`, `DailyRecord`, `ActivityEntry`, `GlobalStats`,
//!   and the `Fields`/`Document` representation used by every store

/// Unified error handling with standard error codes
pub mod errors;

/// Firestore layout constants and defaults
pub mod constants;

/// Activity and document models
pub mod models;
