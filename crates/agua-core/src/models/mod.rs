// ABOUTME: Data models for the water-usage Firestore collections
// ABOUTME: Re-exports activity models and the schema-less document representation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

/// Activity types, daily records, activity entries, and global stats
pub mod activity;

/// Field values, field maps, and documents
pub mod document;

pub use activity::{
    date_key, date_key_value, parse_date_key, ActivityEntry, ActivityType, DailyRecord,
    GlobalStats,
};
pub use document::{Document, FieldValue, Fields};
