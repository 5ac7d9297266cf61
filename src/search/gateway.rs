//! Glean search gateway
//!
//! Issues filtered search requests against the Glean REST API and normalizes
//! the heterogeneous result payload (llmContent vs. snippet lists, nested
//! text fields) into flat `ResultRecord`s at this boundary, so downstream
//! components never re-implement the defensive unwrapping.

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::GleanConfig;
use crate::error::{Error, Result};

/// Snippet size requested for regular searches
const DEFAULT_SNIPPET_SIZE: u32 = 4000;

/// Snippet size requested when reading a single document in full
const FULL_DOCUMENT_SNIPPET_SIZE: u32 = 50_000;

/// Facet bucket size sent with every request
const FACET_BUCKET_SIZE: u32 = 100;

/// A filtered search request against the Glean backend.
///
/// An empty `datasources` list means unrestricted (all sources).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query text (already normalized by the caller)
    pub query: String,
    /// Target applications, e.g. `["salescloud"]`; empty = all
    pub datasources: Vec<String>,
    /// Structured facet predicates applied verbatim
    pub facet_filters: Vec<FacetFilter>,
    /// Requested result count
    pub page_size: u32,
    /// Maximum snippet size in characters
    pub max_snippet_size: u32,
}

impl SearchRequest {
    /// Create a request with the default snippet size
    pub fn new(query: impl Into<String>, datasources: Vec<String>, page_size: u32) -> Self {
        SearchRequest {
            query: query.into(),
            datasources,
            facet_filters: Vec::new(),
            page_size,
            max_snippet_size: DEFAULT_SNIPPET_SIZE,
        }
    }

    /// Add a facet filter
    pub fn with_facet(mut self, filter: FacetFilter) -> Self {
        self.facet_filters.push(filter);
        self
    }
}

/// A facet predicate narrowing search results, in Glean's wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilter {
    /// Field to filter on, e.g. "type" or "last_updated_at"
    pub field_name: String,
    /// Values with their relation to the field
    pub values: Vec<FacetValue>,
}

/// A single facet value with its relation type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValue {
    /// The value to compare against
    pub value: String,
    /// Relation: EQUALS, GT, LT
    pub relation_type: String,
}

impl FacetFilter {
    /// `field == value`
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        FacetFilter {
            field_name: field.into(),
            values: vec![FacetValue {
                value: value.into(),
                relation_type: "EQUALS".to_string(),
            }],
        }
    }

    /// `last_updated_at > date` (date as YYYY-MM-DD)
    pub fn updated_since(date: impl Into<String>) -> Self {
        FacetFilter {
            field_name: "last_updated_at".to_string(),
            values: vec![FacetValue {
                value: date.into(),
                relation_type: "GT".to_string(),
            }],
        }
    }
}

/// A normalized search result.
///
/// `content` is the citation excerpt, flattened to a single string at this
/// boundary and never mutated afterwards. A record carrying `error` marks an
/// upstream failure; the formatter surfaces its message verbatim.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    /// Originating enterprise system (Glean datasource name)
    pub source: String,
    pub author: Option<String>,
    /// Raw update timestamp as returned by the backend
    pub updated: Option<String>,
    pub content: String,
    pub error: Option<String>,
}

impl ResultRecord {
    /// Create an error marker record from an upstream failure
    pub fn from_error(message: impl Into<String>) -> Self {
        ResultRecord {
            title: String::new(),
            url: String::new(),
            source: String::new(),
            author: None,
            updated: None,
            content: String::new(),
            error: Some(message.into()),
        }
    }
}

/// Search backend seam: implemented by `GleanClient` over HTTP, and by stubs
/// in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a filtered search. Result ordering is whatever the backend
    /// returns; the gateway does not re-sort.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>>;

    /// Read the full content of a document previously surfaced by search.
    /// Returns a "No content found." sentinel rather than an error when the
    /// document has no readable body.
    async fn read_document(&self, url: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload<'a> {
    query: &'a str,
    page_size: u32,
    max_snippet_size: u32,
    request_options: RequestOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestOptions<'a> {
    facet_bucket_size: u32,
    return_llm_content_over_snippets: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    datasources_filter: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facet_filters: Option<&'a [FacetFilter]>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    #[serde(default)]
    document: RawDocument,
    /// String when `returnLlmContentOverSnippets` is honored, but the
    /// backend has been observed returning lists too
    llm_content: Option<Value>,
    snippets: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    title: Option<String>,
    url: Option<String>,
    datasource: Option<String>,
    author: Option<RawAuthor>,
    update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: Option<String>,
}

impl RawResult {
    fn into_record(self) -> ResultRecord {
        let content = extract_content(self.llm_content.as_ref(), self.snippets.as_deref());
        ResultRecord {
            title: self.document.title.unwrap_or_else(|| "Untitled".to_string()),
            url: self.document.url.unwrap_or_default(),
            source: self
                .document
                .datasource
                .unwrap_or_else(|| "Unknown".to_string()),
            author: self.document.author.and_then(|a| a.name),
            updated: self.document.update_time,
            content,
            error: None,
        }
    }
}

/// Flatten the heterogeneous content shape into a single string.
///
/// Prefers enriched `llmContent`; falls back to the first snippet,
/// unwrapping `.text` / `.snippet` sub-fields when snippets are structured.
fn extract_content(llm_content: Option<&Value>, snippets: Option<&[Value]>) -> String {
    if let Some(v) = llm_content {
        match v {
            Value::String(s) if !s.is_empty() => return s.clone(),
            Value::Array(items) if !items.is_empty() => {
                return items
                    .iter()
                    .map(value_text)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
            }
            _ => {}
        }
    }

    snippets
        .and_then(|items| items.first())
        .map(value_text)
        .unwrap_or_default()
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("text") {
                return s.clone();
            }
            match map.get("snippet") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Object(inner)) => inner
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Glean search REST API
#[derive(Clone)]
pub struct GleanClient {
    client: Client,
    endpoint: String,
}

impl GleanClient {
    /// Create a client from configuration. The instance name is normalized:
    /// scheme and trailing slashes are stripped, and a bare name like
    /// "guild" expands to "guild-be.glean.com".
    pub fn new(config: &GleanConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}/rest/api/v1/search",
            normalize_instance(&config.instance)
        );
        Self::with_endpoint(config, endpoint)
    }

    /// Create a client against an explicit endpoint URL. Used by tests and
    /// non-standard deployments.
    pub fn with_endpoint(config: &GleanConfig, endpoint: String) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.expose_secret()
        ))
        .map_err(|e| Error::Config(format!("Invalid Glean API token: {}", e)))?;
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(GleanClient { client, endpoint })
    }

    async fn send(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>> {
        let payload = SearchPayload {
            query: &request.query,
            page_size: request.page_size,
            max_snippet_size: request.max_snippet_size,
            request_options: RequestOptions {
                facet_bucket_size: FACET_BUCKET_SIZE,
                return_llm_content_over_snippets: true,
                datasources_filter: if request.datasources.is_empty() {
                    None
                } else {
                    Some(&request.datasources)
                },
                facet_filters: if request.facet_filters.is_empty() {
                    None
                } else {
                    Some(&request.facet_filters)
                },
            },
        };

        debug!(
            query = %request.query,
            datasources = ?request.datasources,
            facets = ?request.facet_filters,
            "glean search request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Search {
                status: 0,
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Search {
                status: status.as_u16(),
                message: truncate(&text, 200),
            });
        }

        let body: SearchResponse = response.json().await?;
        info!(count = body.results.len(), "glean search returned");

        Ok(body.results.into_iter().map(RawResult::into_record).collect())
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Strip scheme and trailing slashes; expand a bare instance name to its
/// backend host.
fn normalize_instance(instance: &str) -> String {
    let clean = instance
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if clean.contains('.') {
        clean.to_string()
    } else {
        format!("{}-be.glean.com", clean)
    }
}

#[async_trait]
impl SearchBackend for GleanClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>> {
        self.send(request).await
    }

    async fn read_document(&self, url: &str) -> Result<String> {
        // Glean has no dedicated read endpoint on this surface; re-search by
        // URL with a large snippet budget and return the matching record's
        // enriched content.
        let mut request = SearchRequest::new(url, Vec::new(), 3);
        request.max_snippet_size = FULL_DOCUMENT_SNIPPET_SIZE;

        let records = self.send(&request).await?;
        let content = records
            .iter()
            .find(|r| r.url == url)
            .or_else(|| records.first())
            .map(|r| r.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            Ok("No content found.".to_string())
        } else {
            Ok(content)
        }
    }
}
