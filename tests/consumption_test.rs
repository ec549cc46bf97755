// ABOUTME: Integration tests for global and per-day consumption totals
// ABOUTME: Builds a small user/record/activity tree in the in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use agua_firestore::constants::{activities_path, daily_records_path, fields, global_stats_path};
use agua_firestore::consumption::{calculate_daily_consumption, calculate_global_consumption};
use agua_firestore::models::{ActivityEntry, ActivityType, Fields};
use agua_firestore::store::{DocumentStore, MemoryStore};
use chrono::{NaiveDate, Utc};

/// One liter per unit so quantities read as liters
fn metered_tap() -> ActivityType {
    ActivityType {
        name: "Grifo".to_owned(),
        liters_per_unit: 1.0,
        category: "Otros".to_owned(),
        unit: "litros".to_owned(),
        icon: "🚰".to_owned(),
    }
}

async fn add_record(store: &MemoryStore, user: &str, record: &str, date_key: &str, liters: &[f64]) {
    store
        .set_document(
            &format!("{}/{record}", daily_records_path(user)),
            &Fields::new().with(fields::DATE_KEY, date_key),
        )
        .await
        .unwrap();
    let tap = metered_tap();
    for amount in liters {
        let entry = ActivityEntry::log("tap", &tap, *amount, Utc::now());
        store
            .add_document(&activities_path(user, record), &entry.to_fields())
            .await
            .unwrap();
    }
}

/// u1 and u3 exist as documents; u2 only exists as the parent of its records
async fn fixture() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .set_document("users/u1", &Fields::new().with("email", "u1@example.com"))
        .await
        .unwrap();
    store
        .set_document("users/u3", &Fields::new().with("email", "u3@example.com"))
        .await
        .unwrap();

    add_record(&store, "u1", "r1", "2025-12-09", &[16.0, 6.0]).await;
    add_record(&store, "u1", "r2", "2025-12-08", &[70.0]).await;
    add_record(&store, "u2", "r3", "2025-12-09", &[150.0]).await;
    store
        .add_document(
            &activities_path("u2", "r3"),
            &Fields::new().with(fields::ACTIVITY_NAME, "Sin registro"),
        )
        .await
        .unwrap();
    add_record(&store, "u3", "r4", "2025-12-08", &[4.0]).await;
    store
}

#[tokio::test]
async fn test_global_consumption_sums_every_activity() {
    let store = fixture().await;

    let totals = calculate_global_consumption(&store).await.unwrap();
    assert!((totals.total_liters - 246.0).abs() < f64::EPSILON);
    assert_eq!(totals.total_activities, 6);
    assert_eq!(totals.users_count, 3);

    let stats = store
        .document(&global_stats_path("water_consumption"))
        .await
        .unwrap();
    assert!((stats.number_or_zero(fields::TOTAL_LITERS) - 246.0).abs() < f64::EPSILON);
    assert!((stats.number_or_zero(fields::TOTAL_ACTIVITIES) - 6.0).abs() < f64::EPSILON);
    assert!((stats.number_or_zero(fields::USERS_COUNT) - 3.0).abs() < f64::EPSILON);
    assert!(stats.timestamp(fields::LAST_UPDATE).is_some());
    assert!(stats.string(fields::LAST_CALCULATION).is_some());
}

#[tokio::test]
async fn test_daily_consumption_only_counts_matching_records() {
    let store = fixture().await;
    let day = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();

    let totals = calculate_daily_consumption(&store, day).await.unwrap();
    assert!((totals.total_liters - 172.0).abs() < f64::EPSILON);
    assert_eq!(totals.total_activities, 4);
    assert_eq!(totals.users_count, 3);

    let stats = store.document(&global_stats_path("2025-12-09")).await.unwrap();
    assert_eq!(stats.string(fields::DATE_KEY), Some("2025-12-09"));
    assert!((stats.number_or_zero(fields::TOTAL_LITERS) - 172.0).abs() < f64::EPSILON);
    assert!((stats.number_or_zero(fields::ACTIVITIES_COUNT) - 4.0).abs() < f64::EPSILON);
    assert!(stats.timestamp(fields::DATE).is_some());
    assert!(stats.timestamp(fields::LAST_UPDATE).is_some());
}

#[tokio::test]
async fn test_empty_database_writes_zero_totals() {
    let store = MemoryStore::new();

    let totals = calculate_global_consumption(&store).await.unwrap();
    assert_eq!(totals.users_count, 0);
    assert!(totals.total_liters.abs() < f64::EPSILON);

    let stats = store
        .document(&global_stats_path("water_consumption"))
        .await
        .unwrap();
    assert!(stats.number_or_zero(fields::TOTAL_LITERS).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_rerunning_a_day_overwrites_its_document() {
    let store = fixture().await;
    let day = NaiveDate::from_ymd_opt(2025, 12, 8).unwrap();

    calculate_daily_consumption(&store, day).await.unwrap();
    add_record(&store, "u3", "r5", "2025-12-08", &[10.0]).await;
    let totals = calculate_daily_consumption(&store, day).await.unwrap();

    assert!((totals.total_liters - 84.0).abs() < f64::EPSILON);
    assert_eq!(store.documents("global_stats").await.len(), 1);
}
