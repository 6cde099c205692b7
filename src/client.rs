//! Knowledge-base API client.
//!
//! `KbClient` wraps the three request shapes the viewer needs: GET JSON,
//! GET JSON with a query string, and POST JSON with a body. There are no
//! retries and no caching. Every transport, status or decoding failure is
//! returned to the caller as a `ClientError`.
//!
//! The renderer talks to the knowledge base through the `KnowledgeBase`
//! trait so tests can substitute an in-memory implementation.

use crate::models::{
    DocumentMentions, EntityRecord, EntityTarget, MentionRecord, PageResponse, Publication,
    RecordEnvelope, SearchResponse, SoftwareFields, SoftwareRow,
};
use crate::paging::Paging;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Search index holding the software display fields.
pub const SOFTWARE_INDEX: &str = "software-kb";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, body read).
    Network { url: String, message: String },
    /// The service answered with a non-success status.
    Status { url: String, status: u16 },
    /// The body was not the JSON we expected.
    Parse { url: String, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network { url, message } => {
                write!(f, "Request to {} failed: {}", url, message)
            }
            ClientError::Status { url, status } => {
                write!(f, "Request to {} returned HTTP {}", url, status)
            }
            ClientError::Parse { url, message } => {
                write!(f, "Invalid JSON from {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for ClientError {}

// ============================================================================
// Knowledge Base Seam
// ============================================================================

/// Read-only view of the knowledge-base endpoints used by the viewer.
pub trait KnowledgeBase: Send + Sync + 'static {
    /// Base URL used for outbound links in rendered pages.
    fn host(&self) -> &str;

    fn entity(
        &self,
        target: &EntityTarget,
    ) -> impl Future<Output = Result<EntityRecord, ClientError>> + Send;

    /// Mentions of a software entity, grouped by document.
    fn entity_mentions(
        &self,
        target: &EntityTarget,
        paging: &Paging,
    ) -> impl Future<Output = Result<PageResponse<DocumentMentions>, ClientError>> + Send;

    /// Software a person has contributed to, with their roles.
    fn person_software(
        &self,
        target: &EntityTarget,
        paging: &Paging,
    ) -> impl Future<Output = Result<PageResponse<SoftwareRow>, ClientError>> + Send;

    fn document(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<Publication, ClientError>> + Send;

    fn relation(
        &self,
        mention_id: &str,
    ) -> impl Future<Output = Result<MentionRecord, ClientError>> + Send;

    /// Search-index display fields for one software id (without prefix).
    /// `None` unless the index returns exactly one hit.
    fn software_fields(
        &self,
        software_id: &str,
    ) -> impl Future<Output = Result<Option<SoftwareFields>, ClientError>> + Send;
}

// ============================================================================
// HTTP Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct KbClient {
    host: String,
    http: reqwest::Client,
}

impl KbClient {
    /// `host` is the base URL without trailing slash; `timeout` of `None`
    /// leaves requests unbounded.
    pub fn new(host: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let host = host.into();
        let mut builder = reqwest::Client::builder().user_agent("Mozilla/5.0 (compatible; MentionsViewer/1.0)");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ClientError::Network {
            url: host.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { host, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    /// GET `path` and decode the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;
        decode(url, response).await
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    pub async fn fetch_json_with_body<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;
        decode(url, response).await
    }

    pub async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, ClientError> {
        self.fetch_json_with_body(&format!("/search/{}/_search", index), query)
            .await
    }
}

async fn decode<T: DeserializeOwned>(url: String, response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            url,
            status: status.as_u16(),
        });
    }
    let body = response.text().await.map_err(|e| ClientError::Network {
        url: url.clone(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&body).map_err(|e| ClientError::Parse {
        url,
        message: e.to_string(),
    })
}

/// Query for the display fields of a single software entity.
pub fn software_fields_query(software_id: &str) -> Value {
    json!({
        "_source": false,
        "fields": ["labels", "descriptions", "number_mentions", "number_documents"],
        "query": { "terms": { "_id": [software_id] } }
    })
}

pub fn entity_path(target: &EntityTarget) -> String {
    format!("/entities/{}/{}", target.kind, urlencoding::encode(&target.id))
}

impl KnowledgeBase for KbClient {
    fn host(&self) -> &str {
        &self.host
    }

    async fn entity(&self, target: &EntityTarget) -> Result<EntityRecord, ClientError> {
        let envelope: RecordEnvelope<EntityRecord> = self.fetch_json(&entity_path(target)).await?;
        Ok(envelope.record)
    }

    async fn entity_mentions(
        &self,
        target: &EntityTarget,
        paging: &Paging,
    ) -> Result<PageResponse<DocumentMentions>, ClientError> {
        let path = format!(
            "{}/mentions?{}&ranker=group_by_document",
            entity_path(target),
            paging.query_string()
        );
        self.fetch_json(&path).await
    }

    async fn person_software(
        &self,
        target: &EntityTarget,
        paging: &Paging,
    ) -> Result<PageResponse<SoftwareRow>, ClientError> {
        let path = format!("{}/software?{}", entity_path(target), paging.query_string());
        self.fetch_json(&path).await
    }

    async fn document(&self, document_id: &str) -> Result<Publication, ClientError> {
        let envelope: RecordEnvelope<Publication> =
            self.fetch_json(&format!("/entities/{}", document_id)).await?;
        Ok(envelope.record)
    }

    async fn relation(&self, mention_id: &str) -> Result<MentionRecord, ClientError> {
        let envelope: RecordEnvelope<MentionRecord> =
            self.fetch_json(&format!("/relations/{}", mention_id)).await?;
        Ok(envelope.record)
    }

    async fn software_fields(&self, software_id: &str) -> Result<Option<SoftwareFields>, ClientError> {
        let response = self
            .search(SOFTWARE_INDEX, &software_fields_query(software_id))
            .await?;
        Ok(response.single_hit())
    }
}
