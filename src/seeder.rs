// ABOUTME: Seeds the activity_types collection from the built-in catalog
// ABOUTME: One sequential insert per entry, with an opt-in upsert keyed by name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::collections::HashMap;

use agua_core::constants::collections;
use agua_core::errors::AppResult;
use agua_core::models::ActivityType;
use tracing::{info, warn};

use crate::store::DocumentStore;

/// How existing documents are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Insert every entry as a new document; re-running duplicates the catalog
    #[default]
    Append,
    /// Overwrite documents whose `name` matches an entry, insert the rest
    UpsertByName,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Documents created
    pub inserted: usize,
    /// Existing documents overwritten
    pub updated: usize,
}

impl SeedReport {
    /// Total documents written
    #[must_use]
    pub const fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Write `catalog` to the `activity_types` collection in order
///
/// Inserts are awaited one at a time. The first failing write aborts the run;
/// documents written before it are kept.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn seed_activity_types(
    store: &dyn DocumentStore,
    catalog: &[ActivityType],
    mode: SeedMode,
) -> AppResult<SeedReport> {
    info!(
        "Seeding {} activity types into '{}' ({})...",
        catalog.len(),
        collections::ACTIVITY_TYPES,
        store.name()
    );

    let existing = match mode {
        SeedMode::Append => HashMap::new(),
        SeedMode::UpsertByName => existing_by_name(store).await?,
    };

    let mut report = SeedReport::default();
    for activity in catalog {
        let fields = activity.to_fields();
        if let Some(path) = existing.get(activity.name.as_str()) {
            store.set_document(path, &fields).await?;
            report.updated += 1;
            info!(
                "  ↻ {} - {} L/{}",
                activity.name, activity.liters_per_unit, activity.unit
            );
        } else {
            store
                .add_document(collections::ACTIVITY_TYPES, &fields)
                .await?;
            report.inserted += 1;
            info!(
                "  ✓ {} - {} L/{}",
                activity.name, activity.liters_per_unit, activity.unit
            );
        }
    }

    info!(
        inserted = report.inserted,
        updated = report.updated,
        "Activity types seeded"
    );
    Ok(report)
}

/// Map of activity name to the path of the first document carrying it
async fn existing_by_name(store: &dyn DocumentStore) -> AppResult<HashMap<String, String>> {
    let documents = store
        .list_documents(collections::ACTIVITY_TYPES, false)
        .await?;

    let mut by_name = HashMap::with_capacity(documents.len());
    for document in &documents {
        match ActivityType::from_document(document) {
            Ok(activity) => {
                by_name
                    .entry(activity.name)
                    .or_insert_with(|| document.path.clone());
            }
            Err(e) => warn!("Ignoring unreadable activity type: {e}"),
        }
    }

    info!(
        "Found {} existing activity types ({} distinct names)",
        documents.len(),
        by_name.len()
    );
    Ok(by_name)
}
