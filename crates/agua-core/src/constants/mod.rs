// ABOUTME: Collection names, document ids, and defaults shared across the workspace
// ABOUTME: Also builds the nested collection paths used by the mobile app
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Constants describing the Firestore layout used by the mobile app:
//!
//! ```text
//! activity_types/{activityTypeId}
//! users/{userId}/daily_records/{recordId}
//! users/{userId}/daily_records/{recordId}/activities/{activityId}
//! global_stats/{dateKey | water_consumption}
//! ```

/// Collection names
pub mod collections {
    /// Catalog of activity types seeded by `seed-activity-types`
    pub const ACTIVITY_TYPES: &str = "activity_types";
    /// Top-level user collection
    pub const USERS: &str = "users";
    /// Per-user daily aggregate sub-collection
    pub const DAILY_RECORDS: &str = "daily_records";
    /// Per-record activity sub-collection
    pub const ACTIVITIES: &str = "activities";
    /// Aggregated consumption documents
    pub const GLOBAL_STATS: &str = "global_stats";
}

/// Well-known document ids
pub mod documents {
    /// Legacy all-time consumption document in `global_stats`
    pub const WATER_CONSUMPTION: &str = "water_consumption";
}

/// Field names as stored in Firestore
#[allow(missing_docs)]
pub mod fields {
    pub const NAME: &str = "name";
    pub const LITERS_PER_UNIT: &str = "litersPerUnit";
    pub const CATEGORY: &str = "category";
    pub const UNIT: &str = "unit";
    pub const ICON: &str = "icon";
    pub const DATE: &str = "date";
    pub const DATE_KEY: &str = "dateKey";
    pub const TOTAL_LITERS: &str = "totalLiters";
    pub const ACTIVITIES_COUNT: &str = "activitiesCount";
    pub const TOTAL_ACTIVITIES: &str = "totalActivities";
    pub const USERS_COUNT: &str = "usersCount";
    pub const LAST_UPDATE: &str = "lastUpdate";
    pub const LAST_CALCULATION: &str = "lastCalculation";
    pub const ACTIVITY_TYPE_ID: &str = "activityTypeId";
    pub const ACTIVITY_NAME: &str = "activityName";
    pub const QUANTITY: &str = "quantity";
    pub const LITERS_USED: &str = "litersUsed";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Defaults
pub mod defaults {
    /// Credential file looked up relative to the working directory
    pub const SERVICE_ACCOUNT_KEY_PATH: &str = "serviceAccountKey.json";
    /// Firestore database id
    pub const DATABASE_ID: &str = "(default)";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Page size for document listings
    pub const LIST_PAGE_SIZE: u32 = 300;
    /// Format of `dateKey` values
    pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
}

/// Path to a user's `daily_records` sub-collection
#[must_use]
pub fn daily_records_path(user_id: &str) -> String {
    format!(
        "{}/{user_id}/{}",
        collections::USERS,
        collections::DAILY_RECORDS
    )
}

/// Path to a daily record's `activities` sub-collection
#[must_use]
pub fn activities_path(user_id: &str, record_id: &str) -> String {
    format!(
        "{}/{record_id}/{}",
        daily_records_path(user_id),
        collections::ACTIVITIES
    )
}

/// Path to a document inside a `global_stats` collection
#[must_use]
pub fn global_stats_path(document_id: &str) -> String {
    format!("{}/{document_id}", collections::GLOBAL_STATS)
}
