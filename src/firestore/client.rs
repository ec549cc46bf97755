// ABOUTME: Firestore REST client implementing the DocumentStore operations
// ABOUTME: Commits writes with field transforms, lists documents by page, and runs equality queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::time::Duration;

use agua_core::constants::defaults;
use agua_core::errors::{AppError, AppResult, ErrorCode};
use agua_core::models::{Document, FieldValue, Fields};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::auth::{ServiceAccountKey, TokenProvider};
use super::value::{decode_fields, encode_fields, encode_value, field_path};
use crate::config::FirestoreConfig;
use crate::store::{
    auto_id, child_path, validate_collection_path, validate_document_path, DocumentStore,
};

/// Bearer token accepted by the Firestore emulator
const EMULATOR_TOKEN: &str = "owner";

/// Store name used in logs and errors
const SERVICE_NAME: &str = "firestore";

/// How requests are authorized
enum Auth {
    /// Service-account OAuth2 tokens
    ServiceAccount(TokenProvider),
    /// Local emulator, no real credentials
    Emulator,
}

/// One document write inside a commit
enum Write<'a> {
    Update {
        path: &'a str,
        fields: &'a Fields,
        mask: bool,
        exists: Option<bool>,
    },
    Delete {
        path: &'a str,
    },
}

impl<'a> Write<'a> {
    /// Create a new document; fails if it already exists
    const fn create(path: &'a str, fields: &'a Fields) -> Self {
        Self::Update {
            path,
            fields,
            mask: false,
            exists: Some(false),
        }
    }

    /// Create or replace a document
    const fn set(path: &'a str, fields: &'a Fields) -> Self {
        Self::Update {
            path,
            fields,
            mask: false,
            exists: None,
        }
    }

    /// Overwrite the given fields of an existing document
    const fn patch(path: &'a str, fields: &'a Fields) -> Self {
        Self::Update {
            path,
            fields,
            mask: true,
            exists: Some(true),
        }
    }
}

/// Error body returned by Google APIs
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Raw document as returned by the REST API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
    #[serde(default)]
    create_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    document: Option<RawDocument>,
}

/// Firestore REST client authenticated with a service account
pub struct FirestoreClient {
    config: FirestoreConfig,
    project_id: String,
    http: Client,
    auth: Auth,
}

impl FirestoreClient {
    /// Load credentials and prepare a client
    ///
    /// The credential file is required unless an emulator host and a project
    /// id are both configured.
    ///
    /// # Errors
    ///
    /// Returns a credential error (`ConfigMissing`/`ConfigInvalid`) if the
    /// key file is absent or unusable, or `ConfigError` if the HTTP client
    /// cannot be built.
    pub fn connect(config: FirestoreConfig) -> AppResult<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        let (project_id, auth) = match (&config.emulator_host, &config.project_id) {
            (Some(_), Some(project_id)) => (project_id.clone(), Auth::Emulator),
            _ => {
                let key = ServiceAccountKey::load(config.credentials_path())?;
                let project_id = config
                    .project_id
                    .clone()
                    .unwrap_or_else(|| key.project_id.clone());
                let auth = if config.is_emulator() {
                    Auth::Emulator
                } else {
                    Auth::ServiceAccount(TokenProvider::new(key, http.clone())?)
                };
                (project_id, auth)
            }
        };

        info!(
            project_id = %project_id,
            database = %config.database_id,
            emulator = config.is_emulator(),
            "Connected to Firestore"
        );

        Ok(Self {
            config,
            project_id,
            http,
            auth,
        })
    }

    /// Project the client writes to
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn documents_url(&self) -> String {
        self.config.documents_url(&self.project_id)
    }

    fn resource_name(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.config.documents_resource(&self.project_id)
        )
    }

    fn relative_path<'a>(&self, name: &'a str) -> &'a str {
        let prefix = self.config.documents_resource(&self.project_id);
        name.strip_prefix(prefix.as_str())
            .map_or(name, |rest| rest.trim_start_matches('/'))
    }

    fn url_for(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.documents_url(), encoded.join("/"))
    }

    async fn authorize(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        let token = match &self.auth {
            Auth::ServiceAccount(provider) => provider.access_token().await?,
            Auth::Emulator => EMULATOR_TOKEN.to_owned(),
        };
        Ok(request.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = self.authorize(request).await?.send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    fn to_document(&self, raw: RawDocument) -> AppResult<Document> {
        let path = self.relative_path(&raw.name).to_owned();
        if raw.create_time.is_none() && raw.fields.is_none() {
            return Ok(Document::missing(path));
        }
        Ok(Document::new(path, decode_fields(raw.fields.as_ref())?))
    }

    fn encode_write(&self, write: &Write<'_>) -> Value {
        match write {
            Write::Delete { path } => json!({ "delete": self.resource_name(path) }),
            Write::Update {
                path,
                fields,
                mask,
                exists,
            } => {
                let mut body = json!({
                    "update": {
                        "name": self.resource_name(path),
                        "fields": encode_fields(fields),
                    }
                });
                let transforms: Vec<Value> = fields
                    .server_timestamp_fields()
                    .into_iter()
                    .map(|name| {
                        json!({ "fieldPath": field_path(name), "setToServerValue": "REQUEST_TIME" })
                    })
                    .collect();
                if !transforms.is_empty() {
                    body["updateTransforms"] = Value::Array(transforms);
                }
                if *mask {
                    let paths: Vec<String> = fields
                        .without_server_timestamps()
                        .names()
                        .map(field_path)
                        .collect();
                    body["updateMask"] = json!({ "fieldPaths": paths });
                }
                if let Some(exists) = exists {
                    body["currentDocument"] = json!({ "exists": exists });
                }
                body
            }
        }
    }

    /// `runQuery` endpoint and collection id for a collection path
    fn run_query_target(&self, collection_path: &str) -> (String, String) {
        let (parent, collection_id) = collection_path
            .rsplit_once('/')
            .map_or(("", collection_path), |(parent, id)| (parent, id));

        let url = if parent.is_empty() {
            format!("{}:runQuery", self.documents_url())
        } else {
            format!("{}:runQuery", self.url_for(parent))
        };
        (url, collection_id.to_owned())
    }

    #[instrument(skip_all, fields(writes = writes.len()))]
    async fn commit(&self, writes: &[Write<'_>]) -> AppResult<()> {
        let body = json!({
            "writes": writes.iter().map(|w| self.encode_write(w)).collect::<Vec<_>>()
        });
        let request = self
            .http
            .post(format!("{}:commit", self.documents_url()))
            .json(&body);
        let _: Value = self.send(request).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Error for a failed response, preferring the RPC status in the body over the HTTP status
fn status_error(status: StatusCode, body: &str) -> AppError {
    let (detail, rpc_status) = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| (body.to_owned(), String::new()),
        |envelope| (envelope.error.message, envelope.error.status),
    );

    let code = match rpc_status.as_str() {
        "NOT_FOUND" => ErrorCode::ResourceNotFound,
        "PERMISSION_DENIED" => ErrorCode::PermissionDenied,
        "UNAUTHENTICATED" => ErrorCode::ExternalAuthFailed,
        "RESOURCE_EXHAUSTED" => ErrorCode::QuotaExceeded,
        "UNAVAILABLE" => ErrorCode::ExternalServiceUnavailable,
        _ => ErrorCode::from_http_status(status.as_u16()),
    };

    AppError::new(code, format!("{SERVICE_NAME} returned {status}: {detail}"))
}

/// Query parameters for one page of a document listing
fn list_query(include_missing: bool, page_token: Option<String>) -> Vec<(&'static str, String)> {
    let mut query = vec![("pageSize", defaults::LIST_PAGE_SIZE.to_string())];
    if include_missing {
        query.push(("showMissing", "true".to_owned()));
    }
    if let Some(token) = page_token {
        query.push(("pageToken", token));
    }
    query
}

/// `structuredQuery` body selecting documents whose `field` equals `value`
fn equality_query(collection_id: &str, field: &str, value: &FieldValue) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection_id }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field_path(field) },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            }
        }
    })
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn add_document(&self, collection_path: &str, fields: &Fields) -> AppResult<String> {
        validate_collection_path(collection_path)?;
        let document_id = auto_id();
        let path = child_path(collection_path, &document_id);
        self.commit(&[Write::create(&path, fields)]).await?;
        debug!(path = %path, "Added document");
        Ok(document_id)
    }

    async fn set_document(&self, document_path: &str, fields: &Fields) -> AppResult<()> {
        validate_document_path(document_path)?;
        self.commit(&[Write::set(document_path, fields)]).await?;
        debug!(path = %document_path, "Set document");
        Ok(())
    }

    async fn update_fields(&self, document_path: &str, fields: &Fields) -> AppResult<()> {
        validate_document_path(document_path)?;
        self.commit(&[Write::patch(document_path, fields)]).await?;
        debug!(path = %document_path, "Updated document fields");
        Ok(())
    }

    async fn delete_document(&self, document_path: &str) -> AppResult<()> {
        validate_document_path(document_path)?;
        self.commit(&[Write::Delete {
            path: document_path,
        }])
        .await?;
        debug!(path = %document_path, "Deleted document");
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_path: &str,
        include_missing: bool,
    ) -> AppResult<Vec<Document>> {
        validate_collection_path(collection_path)?;
        let url = self.url_for(collection_path);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let query = list_query(include_missing, page_token.take());
            let page: ListResponse = self.send(self.http.get(&url).query(&query)).await?;
            for raw in page.documents {
                documents.push(self.to_document(raw)?);
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection = %collection_path, count = documents.len(), "Listed documents");
        Ok(documents)
    }

    async fn query_equal(
        &self,
        collection_path: &str,
        field: &str,
        value: &FieldValue,
    ) -> AppResult<Vec<Document>> {
        validate_collection_path(collection_path)?;
        let (url, collection_id) = self.run_query_target(collection_path);
        let body = equality_query(&collection_id, field, value);

        let results: Vec<QueryResult> = self.send(self.http.post(url).json(&body)).await?;
        results
            .into_iter()
            .filter_map(|result| result.document)
            .map(|raw| self.to_document(raw))
            .collect()
    }
}
