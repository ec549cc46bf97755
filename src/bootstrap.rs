// ABOUTME: Shared startup for the command-line tools: logging, configuration and connection
// ABOUTME: Turns a missing or invalid service-account key into setup guidance and exit code 1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::path::PathBuf;
use std::process;

use agua_core::errors::AppError;
use anyhow::Result;
use tracing::error;

use crate::config::FirestoreConfig;
use crate::firestore::FirestoreClient;
use crate::logging::LoggingConfig;

/// Printed when the service-account key cannot be used
pub const CREDENTIAL_GUIDANCE: &str = "\
A Firebase service-account key is required.
  1. Open the Firebase Console for your project
  2. Settings > Service accounts > Generate new private key
  3. Save the downloaded file as serviceAccountKey.json in the working directory
     (or point AGUA_SERVICE_ACCOUNT_KEY / --credentials at it)";

/// Install the tracing subscriber, honoring `--verbose`
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_logging(verbose: bool) -> Result<()> {
    LoggingConfig::from_env().verbose(verbose).init()
}

/// Configuration from the environment with an optional `--credentials` override
///
/// # Errors
///
/// Returns an error if an environment variable holds an invalid value
pub fn load_config(credentials: Option<PathBuf>) -> Result<FirestoreConfig> {
    Ok(FirestoreConfig::from_env()?.with_credentials_path(credentials))
}

/// Connect to Firestore, or print guidance and exit with status 1 on a credential error
///
/// No document is read or written before the credentials are validated.
///
/// # Errors
///
/// Returns non-credential connection errors (for example an HTTP client
/// that cannot be built).
pub fn connect_or_exit(config: FirestoreConfig) -> Result<FirestoreClient> {
    let path = config.credentials_path().to_path_buf();
    match FirestoreClient::connect(config) {
        Ok(client) => Ok(client),
        Err(e) if e.is_credential_error() => exit_with_guidance(&path, &e),
        Err(e) => Err(e.into()),
    }
}

fn exit_with_guidance(path: &std::path::Path, e: &AppError) -> ! {
    error!("Cannot use service-account key {}: {e}", path.display());
    eprintln!("Service-account key not usable: {}", path.display());
    eprintln!("{CREDENTIAL_GUIDANCE}");
    process::exit(1)
}
