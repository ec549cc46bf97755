// ABOUTME: Inspection and cleanup of the global_stats collection
// ABOUTME: Lists per-document totals and removes the legacy all-time document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use agua_core::constants::{collections, documents, global_stats_path};
use agua_core::errors::AppResult;
use agua_core::models::GlobalStats;
use tracing::info;

use crate::store::DocumentStore;

/// Snapshot of the `global_stats` collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStatsOverview {
    /// One entry per document, in listing order
    pub documents: Vec<GlobalStats>,
    /// Sum of `totalLiters` across all documents
    pub total_liters: f64,
}

impl GlobalStatsOverview {
    fn from_stats(documents: Vec<GlobalStats>) -> Self {
        let total_liters = documents.iter().map(|stats| stats.total_liters).sum();
        Self {
            documents,
            total_liters,
        }
    }
}

/// Read every `global_stats` document and their combined total
///
/// # Errors
///
/// Returns the store error if the collection cannot be listed.
pub async fn check_global_stats(store: &dyn DocumentStore) -> AppResult<GlobalStatsOverview> {
    let listed = store.list_documents(collections::GLOBAL_STATS, false).await?;
    let overview =
        GlobalStatsOverview::from_stats(listed.iter().map(GlobalStats::from_document).collect());

    info!("global_stats holds {} documents", overview.documents.len());
    for stats in &overview.documents {
        info!(
            "{}: {} L (dateKey: {}, lastUpdate: {})",
            stats.id,
            stats.total_liters,
            stats.date_key.as_deref().unwrap_or("N/A"),
            stats
                .last_update
                .map_or_else(|| "N/A".to_owned(), |ts| ts.to_rfc3339())
        );
    }
    info!("Sum of totalLiters: {} L", overview.total_liters);
    Ok(overview)
}

/// Delete `global_stats/water_consumption` and report what remains
///
/// Once per-day documents exist the all-time document double-counts their
/// liters when the collection is summed.
///
/// # Errors
///
/// Returns the store error if the delete or the listing fails.
pub async fn cleanup_old_global(store: &dyn DocumentStore) -> AppResult<GlobalStatsOverview> {
    let path = global_stats_path(documents::WATER_CONSUMPTION);
    store.delete_document(&path).await?;
    info!("Deleted {path}");

    check_global_stats(store).await
}
