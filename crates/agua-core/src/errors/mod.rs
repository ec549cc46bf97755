// ABOUTME: Unified error type and error codes for the Agua Firestore tooling
// ABOUTME: Classifies credential, store, and data failures with conversions from library errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Unified Error Handling
//!
//! Every fallible operation in the workspace returns [`AppResult`]. The
//! [`ErrorCode`] attached to an [`AppError`] tells the binaries which failures
//! are recoverable: only credential problems are handled (guidance is printed
//! and nothing is written), everything else aborts the run.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

/// Standard error codes used throughout the tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Credentials & configuration (1000-1999)
    ConfigMissing = 1000,
    ConfigInvalid = 1001,
    ConfigError = 1002,

    // Authentication against the remote store (2000-2999)
    ExternalAuthFailed = 2000,
    PermissionDenied = 2001,

    // Remote store (3000-3999)
    ExternalServiceError = 3000,
    ExternalServiceUnavailable = 3001,
    QuotaExceeded = 3002,
    ResourceNotFound = 3003,

    // Data (4000-4999)
    InvalidInput = 4000,
    InvalidFormat = 4001,
    SerializationError = 4002,

    // Internal (9000-9999)
    InternalError = 9000,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::ConfigError => "Configuration error encountered",
            Self::ExternalAuthFailed => "Authentication with the document store failed",
            Self::PermissionDenied => "The document store denied the operation",
            Self::ExternalServiceError => "The document store returned an error",
            Self::ExternalServiceUnavailable => "The document store is currently unavailable",
            Self::QuotaExceeded => "The document store quota was exceeded",
            Self::ResourceNotFound => "The requested document was not found",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether this code belongs to the credential branch, the only failure
    /// the binaries recover from with setup guidance
    #[must_use]
    pub const fn is_credential_error(self) -> bool {
        matches!(self, Self::ConfigMissing | Self::ConfigInvalid)
    }

    /// Map an HTTP status returned by the store to an error code
    #[must_use]
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::ExternalAuthFailed,
            403 => Self::PermissionDenied,
            404 => Self::ResourceNotFound,
            400 => Self::InvalidInput,
            429 => Self::QuotaExceeded,
            503 => Self::ExternalServiceUnavailable,
            _ => Self::ExternalServiceError,
        }
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Required configuration (e.g. the credential file) is missing
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Configuration is present but cannot be used
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Generic configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Authentication with the store failed
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// The store answered with an error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// A document was not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Whether the binaries should treat this as the credential branch
    #[must_use]
    pub const fn is_credential_error(&self) -> bool {
        self.code.is_credential_error()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        let code = if error.kind() == io::ErrorKind::NotFound {
            ErrorCode::ConfigMissing
        } else {
            ErrorCode::InternalError
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "http-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let code = if error.is_timeout() || error.is_connect() {
            ErrorCode::ExternalServiceUnavailable
        } else if let Some(status) = error.status() {
            ErrorCode::from_http_status(status.as_u16())
        } else {
            ErrorCode::ExternalServiceError
        };
        Self::new(code, format!("HTTP request failed: {error}")).with_source(error)
    }
}

#[cfg(feature = "jwt-errors")]
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        if matches!(error.kind(), ErrorKind::InvalidKeyFormat) {
            return Self::config_invalid(format!(
                "Service account private key is unusable: {error}"
            ));
        }
        Self::auth_failed(format!("Failed to sign token assertion: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_codes() {
        assert!(ErrorCode::ConfigMissing.is_credential_error());
        assert!(ErrorCode::ConfigInvalid.is_credential_error());
        assert!(!ErrorCode::ExternalServiceError.is_credential_error());
        assert!(!ErrorCode::ConfigError.is_credential_error());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::from_http_status(403), ErrorCode::PermissionDenied);
        assert_eq!(ErrorCode::from_http_status(429), ErrorCode::QuotaExceeded);
        assert_eq!(ErrorCode::from_http_status(500), ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_missing_file_maps_to_config_missing() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error = AppError::from(io_error);
        assert_eq!(error.code, ErrorCode::ConfigMissing);
        assert!(error.is_credential_error());
    }

    #[test]
    fn test_other_io_errors_are_internal() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error = AppError::from(io_error);
        assert_eq!(error.code, ErrorCode::InternalError);
        assert!(!error.is_credential_error());
    }

    #[test]
    fn test_display_includes_description() {
        let error = AppError::not_found("global_stats/water_consumption");
        assert_eq!(
            error.to_string(),
            "The requested document was not found: global_stats/water_consumption not found"
        );
    }
}
