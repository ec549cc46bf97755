// ABOUTME: Integration tests for merging duplicate daily records
// ABOUTME: Checks activity moves, record deletion, and recomputed totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use agua_firestore::cleanup::{cleanup_duplicate_records, CleanupReport};
use agua_firestore::constants::{activities_path, daily_records_path, fields};
use agua_firestore::models::{parse_date_key, DailyRecord, Fields};
use agua_firestore::store::{DocumentStore, MemoryStore};
use chrono::Utc;

async fn add_record(store: &MemoryStore, user: &str, record: &str, date_key: &str, liters: &[f64]) {
    let daily = DailyRecord {
        date: parse_date_key(date_key)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc(),
        date_key: date_key.to_owned(),
        total_liters: liters.iter().sum(),
        activities_count: liters.len() as i64,
    };
    store
        .set_document(
            &format!("{}/{record}", daily_records_path(user)),
            &daily.to_fields(),
        )
        .await
        .unwrap();
    for amount in liters {
        store
            .add_document(
                &activities_path(user, record),
                &Fields::new().with(fields::LITERS_USED, *amount),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_duplicates_are_folded_into_first_record() {
    let store = MemoryStore::new();
    store
        .set_document("users/u1", &Fields::new().with("email", "u1@example.com"))
        .await
        .unwrap();
    add_record(&store, "u1", "a", "2025-12-09", &[8.0]).await;
    add_record(&store, "u1", "b", "2025-12-09", &[6.0, 2.0]).await;
    add_record(&store, "u1", "c", "2025-12-09", &[]).await;
    add_record(&store, "u1", "d", "2025-12-10", &[70.0]).await;

    let report = cleanup_duplicate_records(&store).await.unwrap();
    assert_eq!(
        report,
        CleanupReport {
            users_scanned: 1,
            duplicate_groups: 1,
            records_deleted: 2,
            activities_moved: 2,
        }
    );

    let records = store.documents(&daily_records_path("u1")).await;
    let ids: Vec<&str> = records.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);

    let kept = DailyRecord::from_fields(&records[0].fields);
    assert!((kept.total_liters - 16.0).abs() < f64::EPSILON);
    assert_eq!(kept.activities_count, 3);
    assert_eq!(kept.date_key, "2025-12-09");
    assert!(kept.date <= Utc::now());

    assert_eq!(store.documents(&activities_path("u1", "a")).await.len(), 3);
    assert!(store.documents(&activities_path("u1", "b")).await.is_empty());

    let untouched = &records[1].fields;
    assert!((untouched.number_or_zero(fields::TOTAL_LITERS) - 70.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_users_without_documents_are_not_scanned() {
    let store = MemoryStore::new();
    add_record(&store, "ghost", "a", "2025-12-09", &[8.0]).await;
    add_record(&store, "ghost", "b", "2025-12-09", &[8.0]).await;

    let report = cleanup_duplicate_records(&store).await.unwrap();
    assert_eq!(report, CleanupReport::default());
    assert_eq!(store.documents(&daily_records_path("ghost")).await.len(), 2);
}

#[tokio::test]
async fn test_records_without_date_key_are_left_alone() {
    let store = MemoryStore::new();
    store
        .set_document("users/u1", &Fields::new().with("email", "u1@example.com"))
        .await
        .unwrap();
    for record in ["x", "y"] {
        store
            .set_document(
                &format!("{}/{record}", daily_records_path("u1")),
                &Fields::new().with(fields::TOTAL_LITERS, 1.0),
            )
            .await
            .unwrap();
    }

    let report = cleanup_duplicate_records(&store).await.unwrap();
    assert_eq!(report.duplicate_groups, 0);
    assert_eq!(store.documents(&daily_records_path("u1")).await.len(), 2);
}
