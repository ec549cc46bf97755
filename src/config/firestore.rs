// ABOUTME: Firestore connection configuration loaded from environment variables
// ABOUTME: Credential path, project and database ids, emulator host, and HTTP timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::env;
use std::path::{Path, PathBuf};

use agua_core::constants::defaults;
use agua_core::errors::{AppError, AppResult};
use tracing::info;

/// Production Firestore REST endpoint
const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Service-account key file
    pub credentials_path: PathBuf,
    /// Project id override; the key file's `project_id` is used otherwise
    pub project_id: Option<String>,
    /// Database id, `(default)` unless overridden
    pub database_id: String,
    /// `host:port` of a local Firestore emulator
    pub emulator_host: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(defaults::SERVICE_ACCOUNT_KEY_PATH),
            project_id: None,
            database_id: defaults::DATABASE_ID.to_owned(),
            emulator_host: None,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
        }
    }
}

impl FirestoreConfig {
    /// Load configuration from environment
    ///
    /// Environment variables:
    /// - `AGUA_SERVICE_ACCOUNT_KEY` - credential file (default: `serviceAccountKey.json`)
    /// - `FIRESTORE_PROJECT_ID` - project id override
    /// - `FIRESTORE_DATABASE_ID` - database id (default: `(default)`)
    /// - `FIRESTORE_EMULATOR_HOST` - `host:port` of a local emulator
    /// - `FIRESTORE_TIMEOUT_SECS` - request timeout (default: 30)
    /// - `FIRESTORE_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is set but is not a positive integer.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            credentials_path: env::var("AGUA_SERVICE_ACCOUNT_KEY")
                .map_or_else(|_| PathBuf::from(defaults::SERVICE_ACCOUNT_KEY_PATH), PathBuf::from),
            project_id: non_empty_var("FIRESTORE_PROJECT_ID"),
            database_id: non_empty_var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|| defaults::DATABASE_ID.to_owned()),
            emulator_host: non_empty_var("FIRESTORE_EMULATOR_HOST"),
            request_timeout_secs: timeout_var(
                "FIRESTORE_TIMEOUT_SECS",
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            connect_timeout_secs: timeout_var(
                "FIRESTORE_CONNECT_TIMEOUT_SECS",
                defaults::CONNECT_TIMEOUT_SECS,
            )?,
        };

        if let Some(host) = &config.emulator_host {
            info!(emulator_host = %host, "Using Firestore emulator");
        }

        Ok(config)
    }

    /// Override the credential file, typically from `--credentials`
    #[must_use]
    pub fn with_credentials_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.credentials_path = path;
        }
        self
    }

    /// Credential file location
    #[must_use]
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Whether requests go to a local emulator
    #[must_use]
    pub const fn is_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }

    /// Root URL of the documents resource for `project_id`
    #[must_use]
    pub fn documents_url(&self, project_id: &str) -> String {
        let api = self.emulator_host.as_ref().map_or_else(
            || FIRESTORE_API_URL.to_owned(),
            |host| format!("http://{host}/v1"),
        );
        format!(
            "{api}/projects/{project_id}/databases/{}/documents",
            self.database_id
        )
    }

    /// Resource name prefix used inside request bodies
    #[must_use]
    pub fn documents_resource(&self, project_id: &str) -> String {
        format!(
            "projects/{project_id}/databases/{}/documents",
            self.database_id
        )
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn timeout_var(key: &str, default: u64) -> AppResult<u64> {
    match non_empty_var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                AppError::config(format!("{key} must be a positive number of seconds, got '{raw}'"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_local_key_file() {
        let config = FirestoreConfig::default();
        assert_eq!(config.credentials_path(), Path::new("serviceAccountKey.json"));
        assert_eq!(config.database_id, "(default)");
        assert!(!config.is_emulator());
    }

    #[test]
    fn test_documents_url() {
        let config = FirestoreConfig::default();
        assert_eq!(
            config.documents_url("agua-41cd1"),
            "https://firestore.googleapis.com/v1/projects/agua-41cd1/databases/(default)/documents"
        );
        assert_eq!(
            config.documents_resource("agua-41cd1"),
            "projects/agua-41cd1/databases/(default)/documents"
        );

        let emulator = FirestoreConfig {
            emulator_host: Some("localhost:8080".into()),
            ..FirestoreConfig::default()
        };
        assert_eq!(
            emulator.documents_url("demo"),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
        );
    }

    #[test]
    fn test_credentials_override() {
        let config = FirestoreConfig::default().with_credentials_path(Some("keys/admin.json".into()));
        assert_eq!(config.credentials_path(), Path::new("keys/admin.json"));

        let config = FirestoreConfig::default().with_credentials_path(None);
        assert_eq!(config.credentials_path(), Path::new("serviceAccountKey.json"));
    }
}
