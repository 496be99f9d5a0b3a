//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::bulk::{bulk_lines, parse_bulk_response, BulkFormat};
use crate::types::BatchOperationSummary;
use job_indexer_shared::IndexAction;

/// Prefix `http://` when the URL has no scheme, as in `localhost:9200`.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("localhost:9200").await?;
/// client.create_index("123_4_56").await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    format: BulkFormat,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The server URL, with or without scheme (e.g., "localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let normalized = normalize_url(url);
        let parsed_url =
            Url::parse(&normalized).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %normalized, "Created OpenSearch client");

        Ok(Self {
            client,
            format: BulkFormat::default(),
        })
    }

    /// Emit `_type` in bulk action lines, for Elasticsearch 6 style clusters.
    pub fn with_legacy_doc_types(mut self, enabled: bool) -> Self {
        self.format.legacy_doc_types = enabled;
        self
    }

    /// Index records as top-level documents instead of under `doc`.
    pub fn with_flat_documents(mut self, enabled: bool) -> Self {
        self.format.flat_documents = enabled;
        self
    }

    pub fn bulk_format(&self) -> BulkFormat {
        self.format
    }
}

/// Map the status of an index exists request to whether the index exists.
pub(crate) fn exists_from_status(index: &str, status: u16) -> Result<bool, SearchIndexError> {
    match status {
        200 => Ok(true),
        404 => Ok(false),
        status => Err(SearchIndexError::index_setup(format!(
            "Index exists check for {} returned status {}",
            index, status
        ))),
    }
}

/// Map the status of an index delete request to its outcome.
///
/// A missing index (404) and a bad request (400) are not errors.
pub(crate) fn check_delete_status(
    index: &str,
    status: u16,
    body: &str,
) -> Result<(), SearchIndexError> {
    match status {
        200..=299 => Ok(()),
        400 | 404 => {
            warn!(status = status, body = %body, "Ignoring index delete failure");
            Ok(())
        }
        _ => {
            error!(status = status, body = %body, "Index delete request failed");
            Err(SearchIndexError::index_setup(format!(
                "Delete of index {} failed with status {}: {}",
                index, status, body
            )))
        }
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        exists_from_status(index, response.status_code().as_u16())
    }

    /// Delete an index, ignoring 404 (missing) and 400 (bad request) responses.
    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            debug!("Index deleted");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        check_delete_status(index, status.as_u16(), &error_body)
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index create request failed");
            return Err(SearchIndexError::index_setup(format!(
                "Create of index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        Ok(())
    }

    /// Send all actions in a single `_bulk` request.
    ///
    /// Returns a summary built from the per-item results of the response; a
    /// non-success HTTP status fails the whole call.
    #[instrument(skip(self, actions), fields(count = actions.len()))]
    async fn bulk_index(
        &self,
        actions: &[IndexAction],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let body: Vec<JsonBody<Value>> = bulk_lines(actions, self.format)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        parse_bulk_response(&response_body, actions.len())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        debug!(status = %status, "Cluster health");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_scheme() {
        assert_eq!(normalize_url("localhost:9200"), "http://localhost:9200");
        assert_eq!(normalize_url(" es.internal:9200 "), "http://es.internal:9200");
    }

    #[test]
    fn test_normalize_url_keeps_scheme() {
        assert_eq!(
            normalize_url("https://search.example.com:443"),
            "https://search.example.com:443"
        );
    }

    #[tokio::test]
    async fn test_new_client_does_not_connect() {
        let client = OpenSearchClient::new("localhost:9200").await.unwrap();
        assert_eq!(client.bulk_format(), BulkFormat::default());

        let client = client.with_legacy_doc_types(true).with_flat_documents(true);
        assert!(client.bulk_format().legacy_doc_types);
        assert!(client.bulk_format().flat_documents);
    }

    #[test]
    fn test_exists_from_status() {
        assert!(exists_from_status("idx", 200).unwrap());
        assert!(!exists_from_status("idx", 404).unwrap());
        assert!(matches!(
            exists_from_status("idx", 500),
            Err(SearchIndexError::IndexSetupError(_))
        ));
        assert!(matches!(
            exists_from_status("idx", 401),
            Err(SearchIndexError::IndexSetupError(_))
        ));
    }

    #[test]
    fn test_delete_tolerates_missing_and_bad_request() {
        assert!(check_delete_status("idx", 200, "").is_ok());
        assert!(check_delete_status("idx", 404, "index_not_found_exception").is_ok());
        assert!(check_delete_status("idx", 400, "illegal_argument_exception").is_ok());
    }

    #[test]
    fn test_delete_fails_on_other_statuses() {
        for status in [401, 403, 500, 503] {
            let result = check_delete_status("idx", status, "boom");
            match result {
                Err(SearchIndexError::IndexSetupError(msg)) => {
                    assert!(msg.contains(&status.to_string()));
                    assert!(msg.contains("boom"));
                }
                other => panic!("unexpected result for {}: {:?}", status, other),
            }
        }
    }

    #[tokio::test]
    async fn test_new_client_invalid_url() {
        let result = OpenSearchClient::new("http://").await;
        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
    }
}
