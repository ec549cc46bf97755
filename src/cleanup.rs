// ABOUTME: Merges duplicate daily records that share a dateKey for the same user
// ABOUTME: Moves activities into the kept record and recomputes its totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Duplicate Daily Records
//!
//! The app is expected to keep one `daily_records` document per user and
//! day. When several exist for the same `dateKey`, the first one listed is
//! kept and the others are folded into it.

use agua_core::constants::{activities_path, collections, daily_records_path, fields};
use agua_core::errors::AppResult;
use agua_core::models::{Document, Fields};
use tracing::{info, warn};

use crate::store::{child_path, DocumentStore};

/// Outcome of a cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Existing user documents visited
    pub users_scanned: usize,
    /// `dateKey` groups with more than one record
    pub duplicate_groups: usize,
    /// Duplicate records removed
    pub records_deleted: usize,
    /// Activities copied into a kept record
    pub activities_moved: usize,
}

/// Merge duplicate daily records of every user
///
/// # Errors
///
/// Returns the first store error encountered. Work already done is kept.
pub async fn cleanup_duplicate_records(store: &dyn DocumentStore) -> AppResult<CleanupReport> {
    info!("Looking for duplicate daily records...");
    let mut report = CleanupReport::default();

    for user in store.list_documents(collections::USERS, false).await? {
        report.users_scanned += 1;
        info!("User: {}", user.id);

        let records_path = daily_records_path(&user.id);
        let records = store.list_documents(&records_path, false).await?;

        for (date_key, group) in group_by_date_key(&records) {
            if group.len() < 2 {
                continue;
            }
            report.duplicate_groups += 1;
            info!("  {date_key}: {} duplicate records", group.len());

            let (keep, duplicates) = (group[0], &group[1..]);
            info!("    keeping {}", keep.id);

            for duplicate in duplicates {
                report.activities_moved +=
                    move_activities(store, &user.id, &duplicate.id, &keep.id).await?;
                store
                    .delete_document(&child_path(&records_path, &duplicate.id))
                    .await?;
                report.records_deleted += 1;
                info!("    deleted {}", duplicate.id);
            }

            recompute_totals(store, &user.id, &keep.id).await?;
        }
    }

    info!(
        users = report.users_scanned,
        groups = report.duplicate_groups,
        deleted = report.records_deleted,
        moved = report.activities_moved,
        "Cleanup complete"
    );
    Ok(report)
}

/// Group records by `dateKey`, preserving listing order within and across groups
fn group_by_date_key(records: &[Document]) -> Vec<(&str, Vec<&Document>)> {
    let mut groups: Vec<(&str, Vec<&Document>)> = Vec::new();
    for record in records {
        let Some(key) = record.fields.string(fields::DATE_KEY) else {
            warn!("    record {} has no dateKey, skipping", record.id);
            continue;
        };
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, group)) => group.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}

async fn move_activities(
    store: &dyn DocumentStore,
    user_id: &str,
    from_record: &str,
    to_record: &str,
) -> AppResult<usize> {
    let source = activities_path(user_id, from_record);
    let target = activities_path(user_id, to_record);
    let activities = store.list_documents(&source, false).await?;
    if !activities.is_empty() {
        info!("      moving {} activities", activities.len());
    }

    for activity in &activities {
        store.add_document(&target, &activity.fields).await?;
        store.delete_document(&activity.path).await?;
    }
    Ok(activities.len())
}

async fn recompute_totals(store: &dyn DocumentStore, user_id: &str, record_id: &str) -> AppResult<()> {
    let activities = store
        .list_documents(&activities_path(user_id, record_id), false)
        .await?;
    let total_liters: f64 = activities
        .iter()
        .map(|activity| activity.fields.number_or_zero(fields::LITERS_USED))
        .sum();

    let totals = Fields::new()
        .with(fields::TOTAL_LITERS, total_liters)
        .with(fields::ACTIVITIES_COUNT, activities.len());
    store
        .update_fields(&child_path(&daily_records_path(user_id), record_id), &totals)
        .await?;

    info!(
        "    totals updated: {total_liters} L, {} activities",
        activities.len()
    );
    Ok(())
}
