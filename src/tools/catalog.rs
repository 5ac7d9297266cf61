//! Account-intelligence tool catalog
//!
//! Each search tool is the same `ScopedSearchTool` wrapping a fixed
//! `SearchScope`: the datasources, facet filters, and result count
//! appropriate to its question domain. The scope table is built once at
//! startup and never changes; no per-tool types are needed beyond the
//! document reader.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};
use crate::search::{
    format_results, quote_entity, FacetFilter, ResultRecord, SearchBackend, SearchRequest,
};

use super::registry::ToolRegistry;
use super::traits::{Tool, ToolResult};

/// Fixed search configuration backing one catalog tool
#[derive(Debug, Clone)]
pub struct SearchScope {
    /// Tool name exposed to the reasoning service
    pub name: &'static str,
    /// Tool description for the function schema
    pub description: &'static str,
    /// Human-readable label used in formatted output headers
    pub source_label: &'static str,
    /// Query parameter description for the schema
    pub query_hint: &'static str,
    /// Glean datasources; empty = all sources
    pub datasources: &'static [&'static str],
    /// Facet predicates fixed for this domain
    pub facet_filters: Vec<FacetFilter>,
    /// Requested result count
    pub page_size: u32,
}

/// A query-based search tool with a fixed scope
pub struct ScopedSearchTool {
    scope: SearchScope,
    backend: Arc<dyn SearchBackend>,
}

impl ScopedSearchTool {
    pub fn new(scope: SearchScope, backend: Arc<dyn SearchBackend>) -> Self {
        ScopedSearchTool { scope, backend }
    }

    /// Salesforce opportunities: renewals, contracts, deals, close dates
    pub fn opportunities(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_salesforce_opportunities",
                description: "Search Salesforce OPPORTUNITIES for renewals, contracts, deals, close dates. Query MUST start with the account name. Example: 'AdventHealth renewal date' or 'Target contract'",
                source_label: "Salesforce Opportunities",
                query_hint: "Query starting with account name, e.g., 'AdventHealth renewal'",
                datasources: &["salescloud"],
                facet_filters: vec![FacetFilter::equals("type", "opportunity")],
                page_size: 5,
            },
            backend,
        )
    }

    /// Salesforce account records: company info, account overview
    pub fn accounts(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_salesforce_accounts",
                description: "Search Salesforce ACCOUNT records for company info, account overview. Query MUST start with the account name. Example: 'AdventHealth account overview'",
                source_label: "Salesforce Accounts",
                query_hint: "Query starting with account name, e.g., 'JPMC account'",
                datasources: &["salescloud"],
                facet_filters: vec![FacetFilter::equals("type", "account")],
                page_size: 5,
            },
            backend,
        )
    }

    /// Salesforce contacts: decision makers, stakeholders
    pub fn contacts(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_salesforce_contacts",
                description: "Search Salesforce CONTACTS for decision makers, stakeholders, executives. Query MUST start with the account name. Example: 'AdventHealth contacts' or 'Target decision makers'",
                source_label: "Salesforce Contacts",
                query_hint: "Query starting with account name, e.g., 'AdventHealth contacts'",
                datasources: &["salescloud"],
                facet_filters: vec![FacetFilter::equals("type", "contact")],
                page_size: 5,
            },
            backend,
        )
    }

    /// Metrics: Salesforce budget data plus Looker dashboards
    pub fn metrics(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_metrics_and_dashboards",
                description: "Search Salesforce and Looker for funding caps, spend, enrollments, dashboards. Query should include account name.",
                source_label: "Metrics (Salesforce + Looker)",
                query_hint: "Query with account name, e.g., 'JPMC funding cap'",
                datasources: &["salescloud", "looker"],
                facet_filters: Vec::new(),
                page_size: 6,
            },
            backend,
        )
    }

    /// Strategy documents: QBRs and account plans on Google Drive
    pub fn strategy_docs(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_strategy_docs",
                description: "Search Google Drive for QBRs, Account Plans, strategy documents. Query should include account name.",
                source_label: "Google Drive",
                query_hint: "Query with account name, e.g., 'AdventHealth QBR'",
                datasources: &["gdrive"],
                facet_filters: Vec::new(),
                page_size: 5,
            },
            backend,
        )
    }

    /// Communications: Gong calls, Slack threads, Gmail
    pub fn communications(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_communications",
                description: "Search Gong, Slack, Gmail for calls, sentiment, messages. Query should include account name.",
                source_label: "Communications (Gong/Slack/Gmail)",
                query_hint: "Query with account name, e.g., 'AdventHealth recent call'",
                datasources: &["gong", "slack", "gmail"],
                facet_filters: Vec::new(),
                page_size: 9,
            },
            backend,
        )
    }

    /// Unrestricted cross-source search. Only called after the user approves
    /// widening scope following an empty targeted search.
    pub fn general_fallback(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new(
            SearchScope {
                name: "search_general_fallback",
                description: "Search ALL sources without filtering. Only use when user explicitly approves fallback after other tools fail.",
                source_label: "All Sources",
                query_hint: "Search query",
                datasources: &[],
                facet_filters: Vec::new(),
                page_size: 10,
            },
            backend,
        )
    }

    async fn run(&self, raw_query: &str) -> String {
        let query = quote_entity(raw_query);
        if query != raw_query {
            info!(tool = self.scope.name, %raw_query, %query, "auto-quoted account name");
        }

        let mut request = SearchRequest::new(
            query,
            self.scope.datasources.iter().map(|s| s.to_string()).collect(),
            self.scope.page_size,
        );
        request.facet_filters = self.scope.facet_filters.clone();

        let records = match self.backend.search(&request).await {
            Ok(records) => records,
            // Transport/API failures flow back as a visible error record so
            // the turn continues instead of aborting the session.
            Err(e) => vec![ResultRecord::from_error(e.to_string())],
        };

        format_results(&records, self.scope.source_label)
    }
}

#[async_trait]
impl Tool for ScopedSearchTool {
    fn name(&self) -> &str {
        self.scope.name
    }

    fn description(&self) -> &str {
        self.scope.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": self.scope.query_hint
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'query' parameter".to_string()))?;

        Ok(ToolResult::success(self.run(query).await))
    }
}

/// Reads the full content of a document URL previously surfaced by search
pub struct ReadDocumentTool {
    backend: Arc<dyn SearchBackend>,
}

impl ReadDocumentTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        ReadDocumentTool { backend }
    }
}

#[async_trait]
impl Tool for ReadDocumentTool {
    fn name(&self) -> &str {
        "read_full_document"
    }

    fn description(&self) -> &str {
        "Read the full text of a document URL found via a previous search."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Document URL from a search result"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'url' parameter".to_string()))?;

        info!(%url, "reading full document");
        match self.backend.read_document(url).await {
            Ok(content) => Ok(ToolResult::success(format!(
                "--- DOCUMENT CONTENT FOR '{}' ---\n{}",
                url, content
            ))),
            Err(e) => Ok(ToolResult::success(format!(
                "Error reading document: {}",
                e
            ))),
        }
    }
}

/// Build the full account-intelligence catalog against one backend.
///
/// Registration order is the order tools appear in the schema sent to the
/// reasoning service.
pub fn account_tools(backend: Arc<dyn SearchBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(ScopedSearchTool::opportunities(backend.clone()));
    registry.register(ScopedSearchTool::accounts(backend.clone()));
    registry.register(ScopedSearchTool::contacts(backend.clone()));
    registry.register(ScopedSearchTool::metrics(backend.clone()));
    registry.register(ScopedSearchTool::strategy_docs(backend.clone()));
    registry.register(ScopedSearchTool::communications(backend.clone()));
    registry.register(ScopedSearchTool::general_fallback(backend.clone()));
    registry.register(ReadDocumentTool::new(backend));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolCall;
    use tokio::sync::Mutex;

    /// Records every request it receives and replays canned results.
    struct RecordingBackend {
        requests: Mutex<Vec<SearchRequest>>,
        results: Vec<ResultRecord>,
        fail: bool,
    }

    impl RecordingBackend {
        fn new(results: Vec<ResultRecord>) -> Arc<Self> {
            Arc::new(RecordingBackend {
                requests: Mutex::new(Vec::new()),
                results,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(RecordingBackend {
                requests: Mutex::new(Vec::new()),
                results: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>> {
            self.requests.lock().await.push(request.clone());
            if self.fail {
                return Err(Error::Search {
                    status: 503,
                    message: "backend down".to_string(),
                });
            }
            Ok(self.results.clone())
        }

        async fn read_document(&self, url: &str) -> Result<String> {
            self.requests
                .lock()
                .await
                .push(SearchRequest::new(url, Vec::new(), 1));
            Ok("full body".to_string())
        }
    }

    fn sample_record() -> ResultRecord {
        ResultRecord {
            title: "Acme — Renewal FY26".to_string(),
            url: "https://crm.example/opp/1".to_string(),
            source: "salescloud".to_string(),
            author: None,
            updated: None,
            content: "Renewal closes 2026-08-30.".to_string(),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_opportunities_routing_fixes_scope_and_quotes_query() {
        let backend = RecordingBackend::new(vec![sample_record()]);
        let registry = account_tools(backend.clone());

        let call = ToolCall {
            id: "call_1".to_string(),
            name: "search_salesforce_opportunities".to_string(),
            arguments: json!({"query": "Acme renewal"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);

        let requests = backend.requests.lock().await;
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.query, "\"Acme\" renewal");
        assert_eq!(req.datasources, vec!["salescloud"]);
        assert_eq!(req.facet_filters, vec![FacetFilter::equals("type", "opportunity")]);
        assert_eq!(req.page_size, 5);
    }

    #[tokio::test]
    async fn test_communications_scope_spans_three_sources() {
        let backend = RecordingBackend::new(Vec::new());
        let tool = ScopedSearchTool::communications(backend.clone());

        let result = tool.execute(json!({"query": "Acme recent calls"})).await.unwrap();
        assert_eq!(
            result.into_text(),
            "No results found in Communications (Gong/Slack/Gmail)."
        );

        let requests = backend.requests.lock().await;
        assert_eq!(requests[0].datasources, vec!["gong", "slack", "gmail"]);
        assert_eq!(requests[0].page_size, 9);
        assert!(requests[0].facet_filters.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_scope_is_unrestricted() {
        let backend = RecordingBackend::new(Vec::new());
        let tool = ScopedSearchTool::general_fallback(backend.clone());
        tool.execute(json!({"query": "Acme"})).await.unwrap();

        let requests = backend.requests.lock().await;
        assert!(requests[0].datasources.is_empty());
        assert_eq!(requests[0].page_size, 10);
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_as_text() {
        let backend = RecordingBackend::failing();
        let tool = ScopedSearchTool::opportunities(backend);

        let result = tool.execute(json!({"query": "Acme renewal"})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.into_text(), "Glean API error (503): backend down");
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_input() {
        let backend = RecordingBackend::new(Vec::new());
        let tool = ScopedSearchTool::opportunities(backend);
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_read_document_tool_wraps_content() {
        let backend = RecordingBackend::new(Vec::new());
        let tool = ReadDocumentTool::new(backend);
        let result = tool
            .execute(json!({"url": "https://docs.example/qbr"}))
            .await
            .unwrap();
        let text = result.into_text();
        assert!(text.contains("https://docs.example/qbr"));
        assert!(text.contains("full body"));
    }

    #[tokio::test]
    async fn test_catalog_registration_order() {
        let backend = RecordingBackend::new(Vec::new());
        let registry = account_tools(backend);
        assert_eq!(registry.count(), 8);
        assert_eq!(
            registry.names(),
            vec![
                "search_salesforce_opportunities",
                "search_salesforce_accounts",
                "search_salesforce_contacts",
                "search_metrics_and_dashboards",
                "search_strategy_docs",
                "search_communications",
                "search_general_fallback",
                "read_full_document",
            ]
        );
    }
}
