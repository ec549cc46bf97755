// ABOUTME: End-to-end tests running the seed-activity-types binary
// ABOUTME: Verifies the credential guard, dry runs, and the schema reference output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::process::{Command, Output};

use tempfile::TempDir;

fn run_seeder(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seed-activity-types"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("AGUA_SERVICE_ACCOUNT_KEY")
        .env_remove("FIRESTORE_EMULATOR_HOST")
        .env_remove("FIRESTORE_PROJECT_ID")
        .env("RUST_LOG", "info")
        .output()
        .unwrap()
}

#[test]
fn test_missing_credentials_exit_with_guidance() {
    let dir = TempDir::new().unwrap();
    let output = run_seeder(&dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Generate new private key"), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('✓'), "no entry may be written: {stdout}");
}

#[test]
fn test_invalid_credentials_exit_with_guidance() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("serviceAccountKey.json"), "{}").unwrap();
    let output = run_seeder(&dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("serviceAccountKey.json"));
}

#[test]
fn test_dry_run_needs_no_credentials() {
    let dir = TempDir::new().unwrap();
    let output = run_seeder(&dir, &["--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ducha - 8 L/minutos"), "stdout: {stdout}");
    assert!(stdout.contains("Llenar piscina - 500 L/llenadas"));
}

#[test]
fn test_print_schema_lists_catalog_and_layout() {
    let dir = TempDir::new().unwrap();
    let output = run_seeder(&dir, &["--print-schema"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("activity_types/ (12 entries)"));
    assert!(stdout.contains("daily_records"));
}
