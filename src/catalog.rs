// ABOUTME: Built-in catalog of water-usage activity types seeded into Firestore
// ABOUTME: Also documents the collection layout and the manual Firebase setup steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Activity Type Catalog
//!
//! The single source for the `activity_types` collection. The entries can be
//! seeded with `seed-activity-types` or copied by hand into the Firestore
//! console; `seed-activity-types --print-schema` prints them together with
//! the layout below.
//!
//! ```text
//! activity_types/{activityId}
//!     name, litersPerUnit, category, unit, icon
//! users/{userId}/daily_records/{recordId}
//!     date, dateKey ("2025-12-09"), totalLiters, activitiesCount
//! users/{userId}/daily_records/{recordId}/activities/{activityId}
//!     activityTypeId, activityName, quantity, litersUsed, category, icon, timestamp
//! ```

use std::fmt::Write as _;

use agua_core::constants::collections;
use agua_core::models::ActivityType;

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    /// Display name
    pub name: &'static str,
    /// Liters per unit of activity
    pub liters_per_unit: f64,
    /// Household category
    pub category: &'static str,
    /// Measurement unit
    pub unit: &'static str,
    /// Display glyph
    pub icon: &'static str,
}

impl CatalogEntry {
    /// Owned model for this entry
    #[must_use]
    pub fn to_activity_type(&self) -> ActivityType {
        ActivityType {
            name: self.name.to_owned(),
            liters_per_unit: self.liters_per_unit,
            category: self.category.to_owned(),
            unit: self.unit.to_owned(),
            icon: self.icon.to_owned(),
        }
    }
}

/// Activity types in seeding order
pub const ACTIVITY_TYPES: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Ducha",
        liters_per_unit: 8.0,
        category: "Higiene",
        unit: "minutos",
        icon: "🚿",
    },
    CatalogEntry {
        name: "Usar WC",
        liters_per_unit: 6.0,
        category: "Higiene",
        unit: "veces",
        icon: "🚽",
    },
    CatalogEntry {
        name: "Lavar platos a mano",
        liters_per_unit: 20.0,
        category: "Limpieza",
        unit: "sesiones",
        icon: "🍽️",
    },
    CatalogEntry {
        name: "Lavavajillas",
        liters_per_unit: 15.0,
        category: "Limpieza",
        unit: "cargas",
        icon: "🔧",
    },
    CatalogEntry {
        name: "Lavadora",
        liters_per_unit: 70.0,
        category: "Limpieza",
        unit: "cargas",
        icon: "👕",
    },
    CatalogEntry {
        name: "Regar plantas",
        liters_per_unit: 10.0,
        category: "Jardín",
        unit: "sesiones",
        icon: "🌱",
    },
    CatalogEntry {
        name: "Cepillar dientes",
        liters_per_unit: 5.0,
        category: "Higiene",
        unit: "minutos",
        icon: "🦷",
    },
    CatalogEntry {
        name: "Lavar manos",
        liters_per_unit: 2.0,
        category: "Higiene",
        unit: "veces",
        icon: "🧼",
    },
    CatalogEntry {
        name: "Cocinar",
        liters_per_unit: 15.0,
        category: "Cocina",
        unit: "sesiones",
        icon: "🍳",
    },
    CatalogEntry {
        name: "Lavar auto",
        liters_per_unit: 150.0,
        category: "Otros",
        unit: "lavados",
        icon: "🚗",
    },
    CatalogEntry {
        name: "Limpiar piso",
        liters_per_unit: 12.0,
        category: "Limpieza",
        unit: "sesiones",
        icon: "🧹",
    },
    CatalogEntry {
        name: "Llenar piscina",
        liters_per_unit: 500.0,
        category: "Otros",
        unit: "llenadas",
        icon: "🏊",
    },
];

/// Manual setup steps for a new Firebase project
pub const SETUP_STEPS: &[&str] = &[
    "Open https://console.firebase.google.com/ and create a project (or reuse one)",
    "Add the Android/iOS app and download google-services.json / GoogleService-Info.plist",
    "Enable Firestore Database",
    "Create the `activity_types` collection and add one document per catalog entry, \
     or run `seed-activity-types` with a service account key",
    "For seeding: Settings > Service accounts > Generate new private key, \
     saved as serviceAccountKey.json next to the binary",
];

/// The catalog as owned models, in seeding order
#[must_use]
pub fn activity_types() -> Vec<ActivityType> {
    ACTIVITY_TYPES
        .iter()
        .map(CatalogEntry::to_activity_type)
        .collect()
}

/// Look up an entry by name
#[must_use]
pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    ACTIVITY_TYPES.iter().find(|entry| entry.name == name)
}

/// Human-readable reference: catalog, collection layout, and setup steps
#[must_use]
pub fn reference_sheet() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}/ ({} entries)", collections::ACTIVITY_TYPES, ACTIVITY_TYPES.len());
    for entry in ACTIVITY_TYPES {
        let _ = writeln!(
            out,
            "  {} {:<22} {:>6} L/{:<9} [{}]",
            entry.icon, entry.name, entry.liters_per_unit, entry.unit, entry.category
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "users/{{userId}}/daily_records/{{recordId}}");
    let _ = writeln!(out, "  date, dateKey, totalLiters, activitiesCount");
    let _ = writeln!(out, "users/{{userId}}/daily_records/{{recordId}}/activities/{{activityId}}");
    let _ = writeln!(
        out,
        "  activityTypeId, activityName, quantity, litersUsed, category, icon, timestamp"
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Setup:");
    for (index, step) in SETUP_STEPS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", index + 1);
    }
    out
}
