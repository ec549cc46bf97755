// ABOUTME: Aggregates water consumption across all users into global_stats documents
// ABOUTME: Supports an all-time total and a per-day total keyed by dateKey
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Global Consumption
//!
//! Both jobs walk `users/{userId}/daily_records/{recordId}/activities` and
//! sum `litersUsed` (absent values count as zero). User ids are discovered
//! with missing documents included, since the app only ever writes the
//! sub-collections under a user id.

use agua_core::constants::{
    activities_path, collections, daily_records_path, documents, fields, global_stats_path,
};
use agua_core::errors::AppResult;
use agua_core::models::{date_key, date_key_value, Document, FieldValue, Fields};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, Utc};
use tracing::{debug, info};

use crate::store::DocumentStore;

/// Totals produced by a consumption run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsumptionTotals {
    /// Sum of `litersUsed`
    pub total_liters: f64,
    /// Activities counted
    pub total_activities: usize,
    /// User ids visited
    pub users_count: usize,
}

impl ConsumptionTotals {
    fn add_record(&mut self, liters: f64, activities: usize) {
        self.total_liters += liters;
        self.total_activities += activities;
    }
}

/// Sum every activity ever logged and store it in `global_stats/water_consumption`
///
/// # Errors
///
/// Returns the first store error encountered; nothing is written in that case.
pub async fn calculate_global_consumption(store: &dyn DocumentStore) -> AppResult<ConsumptionTotals> {
    info!("Calculating global consumption across all users...");
    let mut totals = ConsumptionTotals::default();

    for user in store.list_documents(collections::USERS, true).await? {
        totals.users_count += 1;
        let records = store
            .list_documents(&daily_records_path(&user.id), false)
            .await?;
        info!("User {}: {} daily records", user.id, records.len());

        for record in &records {
            let (liters, count) = sum_activities(store, &user.id, record).await?;
            totals.add_record(liters, count);
        }
    }

    log_totals("All-time", &totals);
    if totals.users_count == 0 {
        info!("No users found yet; the total will grow once someone logs activities");
    }

    let stats = Fields::new()
        .with(fields::TOTAL_LITERS, totals.total_liters)
        .with(fields::TOTAL_ACTIVITIES, totals.total_activities)
        .with(fields::USERS_COUNT, totals.users_count)
        .with(fields::LAST_UPDATE, FieldValue::ServerTimestamp)
        .with(
            fields::LAST_CALCULATION,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    store
        .set_document(&global_stats_path(documents::WATER_CONSUMPTION), &stats)
        .await?;

    info!("Global consumption updated: {} L", totals.total_liters);
    Ok(totals)
}

/// Sum the activities logged on `date` and store them in `global_stats/{dateKey}`
///
/// Users without a record for the day are skipped but still counted.
///
/// # Errors
///
/// Returns the first store error encountered; nothing is written in that case.
pub async fn calculate_daily_consumption(
    store: &dyn DocumentStore,
    date: NaiveDate,
) -> AppResult<ConsumptionTotals> {
    let key = date_key(date);
    info!("Calculating global consumption for {key}...");
    let mut totals = ConsumptionTotals::default();
    let filter = date_key_value(date);

    for user in store.list_documents(collections::USERS, true).await? {
        totals.users_count += 1;
        let records = store
            .query_equal(&daily_records_path(&user.id), fields::DATE_KEY, &filter)
            .await?;

        if records.is_empty() {
            debug!("User {} has no record for {key}", user.id);
            continue;
        }

        for record in &records {
            let (liters, count) = sum_activities(store, &user.id, record).await?;
            info!("User {}: record {} with {count} activities, {liters} L", user.id, record.id);
            totals.add_record(liters, count);
        }
    }

    log_totals(&key, &totals);

    let stats = Fields::new()
        .with(fields::TOTAL_LITERS, totals.total_liters)
        .with(fields::DATE, local_midnight(date))
        .with(fields::DATE_KEY, key.as_str())
        .with(fields::LAST_UPDATE, FieldValue::ServerTimestamp)
        .with(fields::ACTIVITIES_COUNT, totals.total_activities)
        .with(fields::USERS_COUNT, totals.users_count);
    store.set_document(&global_stats_path(&key), &stats).await?;

    info!("Global consumption for {key} updated: {} L", totals.total_liters);
    Ok(totals)
}

/// Liters and activity count of one daily record
async fn sum_activities(
    store: &dyn DocumentStore,
    user_id: &str,
    record: &Document,
) -> AppResult<(f64, usize)> {
    let activities = store
        .list_documents(&activities_path(user_id, &record.id), false)
        .await?;

    let liters = activities
        .iter()
        .map(|activity| activity.fields.number_or_zero(fields::LITERS_USED))
        .sum();
    for activity in &activities {
        debug!(
            "  {}: {} L",
            activity
                .fields
                .string(fields::ACTIVITY_NAME)
                .unwrap_or("(unnamed)"),
            activity.fields.number_or_zero(fields::LITERS_USED)
        );
    }
    Ok((liters, activities.len()))
}

/// Start of `date` in the local time zone, as UTC
fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map_or_else(|| midnight.and_utc(), |local| local.with_timezone(&Utc))
}

fn log_totals(label: &str, totals: &ConsumptionTotals) {
    info!("=== {label} summary ===");
    info!("Users found: {}", totals.users_count);
    info!("Activities: {}", totals.total_activities);
    info!("Total: {} L", totals.total_liters);
}
