// ABOUTME: Firestore integration over the v1 REST API
// ABOUTME: Service-account authentication, value wire codec, and the DocumentStore client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Administrative Firestore access without an SDK: a service-account key
//! signs OAuth2 assertions, and every write goes through `documents:commit`
//! so server timestamps can be applied as field transforms.

/// Service-account keys and access tokens
pub mod auth;

/// REST client implementing [`crate::store::DocumentStore`]
pub mod client;

/// Typed JSON value codec
pub mod value;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::FirestoreClient;
