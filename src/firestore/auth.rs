// ABOUTME: Service-account credential loading and OAuth2 access tokens for Firestore
// ABOUTME: Signs RS256 JWT assertions and caches the exchanged token until shortly before expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Service Account Authentication
//!
//! Administrative access uses the JWT bearer grant:
//!
//! 1. Load the service-account key JSON downloaded from the Firebase console
//!    (Settings > Service accounts > Generate new private key).
//! 2. Sign a short-lived RS256 assertion with the key's private key.
//! 3. Exchange the assertion at the key's `token_uri` for an access token.
//!
//! Loading the key is the only failure the binaries recover from, so every
//! problem with the key file maps to a credential error code.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use agua_core::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// OAuth2 scope granting Firestore access
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Token endpoint used when the key file does not name one
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// JWT bearer grant type
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (Google's maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the access token this long before it expires
const TOKEN_REFRESH_BUFFER_SECS: i64 = 300;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// Service-account key file contents
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Must be `service_account`
    #[serde(rename = "type")]
    pub key_type: String,
    /// Project the key belongs to
    pub project_id: String,
    /// Id of the private key, sent as the JWT `kid`
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Service account identity
    pub client_email: String,
    /// OAuth2 token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[REDACTED]")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Load and validate a key file
    ///
    /// # Errors
    ///
    /// - `ConfigMissing` if the file does not exist
    /// - `ConfigInvalid` if it cannot be read or is not a service-account key
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            let error = if e.kind() == ErrorKind::NotFound {
                AppError::config_missing(format!(
                    "Service account key not found at {}",
                    path.display()
                ))
            } else {
                AppError::config_invalid(format!(
                    "Cannot read service account key {}: {e}",
                    path.display()
                ))
            };
            error.with_source(e)
        })?;

        let key = Self::from_json(&raw)?;
        debug!(
            path = %path.display(),
            project_id = %key.project_id,
            client_email = %key.client_email,
            "Loaded service account key"
        );
        Ok(key)
    }

    /// Parse and validate key JSON
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the JSON is malformed, is not of type
    /// `service_account`, or lacks a PEM private key.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let key: Self = serde_json::from_str(raw).map_err(|e| {
            AppError::config_invalid(format!("Service account key is not valid JSON: {e}"))
        })?;

        if key.key_type != "service_account" {
            return Err(AppError::config_invalid(format!(
                "Expected a 'service_account' key, found '{}'",
                key.key_type
            )));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(AppError::config_invalid(
                "Service account key has no PEM private key",
            ));
        }
        if key.project_id.trim().is_empty() || key.client_email.trim().is_empty() {
            return Err(AppError::config_invalid(
                "Service account key is missing project_id or client_email",
            ));
        }

        Ok(key)
    }
}

/// Claims of the signed assertion exchanged for an access token
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Cached access token with expiry tracking
struct CachedToken {
    token: String,
    refresh_at: DateTime<Utc>,
}

/// Access token provider for a service account
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached_token: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider, parsing the private key up front
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the private key is not a usable RSA PEM key.
    pub fn new(key: ServiceAccountKey, client: Client) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::config_invalid(format!("Service account private key is unusable: {e}"))
                .with_source(e)
        })?;

        Ok(Self {
            key,
            encoding_key,
            client,
            cached_token: RwLock::new(None),
        })
    }

    /// Project the key belongs to
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.key.project_id
    }

    /// Sign an assertion issued at `now`
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn assertion(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Get a valid access token, exchanging a new assertion when needed
    ///
    /// # Errors
    ///
    /// Returns `ExternalAuthFailed` if the token endpoint rejects the assertion.
    pub async fn access_token(&self) -> AppResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.refresh_at > Utc::now() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let now = Utc::now();
        let response = self.exchange(&self.assertion(now)?).await?;
        let lifetime = response.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        let refresh_at = now + Duration::seconds(lifetime - TOKEN_REFRESH_BUFFER_SECS);

        info!(
            client_email = %self.key.client_email,
            expires_in_secs = lifetime,
            "Obtained Firestore access token"
        );

        let token = response.access_token;
        *self.cached_token.write().await = Some(CachedToken {
            token: token.clone(),
            refresh_at,
        });
        Ok(token)
    }

    async fn exchange(&self, assertion: &str) -> AppResult<TokenResponse> {
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = match ErrorCode::from_http_status(status.as_u16()) {
                ErrorCode::ExternalServiceUnavailable => ErrorCode::ExternalServiceUnavailable,
                _ => ErrorCode::ExternalAuthFailed,
            };
            return Err(AppError::new(
                code,
                format!("Token exchange failed ({status}): {body}"),
            ));
        }

        Ok(response.json().await?)
    }
}
