//! Scrapy Cloud job storage client.
//!
//! Reads job metadata and items from the storage HTTP API. Items are fetched
//! page by page as the stream is polled, resuming each page after the `_key`
//! of the last item seen.

use std::future::Future;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::errors::PipelineError;
use crate::source::{JobMetadata, JobSource};
use job_indexer_shared::{JobId, Record};

/// Default storage API endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://storage.scrapinghub.com";

/// Items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Item meta field carrying the item's storage key.
const KEY_FIELD: &str = "_key";

/// Configuration for the Scrapy Cloud client.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the storage API.
    pub storage_url: String,
    /// Number of items fetched per request.
    pub page_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Client for the Scrapy Cloud storage API.
pub struct ScrapyCloudClient {
    http: reqwest::Client,
    api_key: String,
    config: SourceConfig,
}

impl ScrapyCloudClient {
    /// Create a client with the default storage endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, PipelineError> {
        Self::with_config(api_key, SourceConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapyCloudClient)` - A new client instance
    /// * `Err(PipelineError)` - If the API key is empty or the page size is zero
    pub fn with_config(
        api_key: impl Into<String>,
        config: SourceConfig,
    ) -> Result<Self, PipelineError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PipelineError::configuration("Scrapy Cloud API key is empty"));
        }
        if config.page_size == 0 {
            return Err(PipelineError::configuration("page size must be positive"));
        }

        info!(storage_url = %config.storage_url, "Created Scrapy Cloud client");

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        })
    }

    fn endpoint(&self, resource: &str, job: &JobId) -> String {
        format!(
            "{}/{}/{}",
            self.config.storage_url.trim_end_matches('/'),
            resource,
            job
        )
    }

    fn metadata_request(&self, job: &JobId) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint("jobs", job))
            .basic_auth(&self.api_key, Some(""))
    }
}

#[async_trait]
impl JobSource for ScrapyCloudClient {
    #[instrument(skip(self), fields(job = %job))]
    async fn job_metadata(&self, job: &JobId) -> Result<JobMetadata, PipelineError> {
        let response = self
            .metadata_request(job)
            .send()
            .await
            .map_err(|e| PipelineError::source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Job metadata request failed");
            return Err(PipelineError::source(format!(
                "Job metadata request for {} failed with status {}: {}",
                job, status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PipelineError::parse(e.to_string()))?;

        JobMetadata::from_value(body)
    }

    fn items(&self, job: &JobId) -> BoxStream<'static, Result<Record, PipelineError>> {
        let http = self.http.clone();
        let url = self.endpoint("items", job);
        let api_key = self.api_key.clone();
        let page_size = self.config.page_size;

        paged_items(page_size, move |start_after| {
            let http = http.clone();
            let url = url.clone();
            let api_key = api_key.clone();
            async move { fetch_page(&http, &url, &api_key, page_size, start_after).await }
        })
        .boxed()
    }
}

/// Build the request for one page of items, starting after the given item key.
fn page_request(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    count: usize,
    start_after: Option<String>,
) -> reqwest::RequestBuilder {
    let mut query = vec![
        ("format", "json".to_string()),
        ("meta", KEY_FIELD.to_string()),
        ("count", count.to_string()),
    ];
    if let Some(key) = start_after {
        query.push(("startafter", key));
    }

    http.get(url).basic_auth(api_key, Some("")).query(&query)
}

/// Request one page of items, starting after the given item key.
async fn fetch_page(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    count: usize,
    start_after: Option<String>,
) -> Result<Vec<Record>, PipelineError> {
    let response = page_request(http, url, api_key, count, start_after)
        .send()
        .await
        .map_err(|e| PipelineError::source(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "Items request failed");
        return Err(PipelineError::source(format!(
            "Items request failed with status {}: {}",
            status, error_body
        )));
    }

    response
        .json::<Vec<Record>>()
        .await
        .map_err(|e| PipelineError::parse(e.to_string()))
}

struct PageCursor<F> {
    fetch: F,
    page_size: usize,
    start_after: Option<String>,
    exhausted: bool,
}

/// Turn a page fetcher into a lazy stream of items.
///
/// Pages are requested only when the previous page has been consumed. A page
/// shorter than `page_size` ends the stream.
pub(crate) fn paged_items<F, Fut>(
    page_size: usize,
    fetch: F,
) -> impl futures::Stream<Item = Result<Record, PipelineError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<Record>, PipelineError>>,
{
    let cursor = PageCursor {
        fetch,
        page_size,
        start_after: None,
        exhausted: false,
    };

    stream::try_unfold(cursor, next_page)
        .map_ok(|page| stream::iter(page.into_iter().map(Ok::<Record, PipelineError>)))
        .try_flatten()
}

async fn next_page<F, Fut>(
    mut cursor: PageCursor<F>,
) -> Result<Option<(Vec<Record>, PageCursor<F>)>, PipelineError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<Record>, PipelineError>>,
{
    if cursor.exhausted {
        return Ok(None);
    }

    let raw = (cursor.fetch)(cursor.start_after.take()).await?;
    if raw.is_empty() {
        return Ok(None);
    }

    let fetched = raw.len();
    let (page, last_key) = strip_keys(raw);
    debug!(count = fetched, last_key = ?last_key, "Fetched items page");

    if fetched < cursor.page_size {
        cursor.exhausted = true;
    } else {
        match last_key {
            Some(key) => cursor.start_after = Some(key),
            None => {
                return Err(PipelineError::parse(format!(
                    "item page is missing the {} field needed to continue",
                    KEY_FIELD
                )))
            }
        }
    }

    Ok(Some((page, cursor)))
}

/// Remove the `_key` meta field from every item, returning the last key seen.
fn strip_keys(raw: Vec<Record>) -> (Vec<Record>, Option<String>) {
    let mut last_key = None;
    let page = raw
        .into_iter()
        .map(|mut item| {
            if let Some(Value::String(key)) = item.remove(KEY_FIELD) {
                last_key = Some(key);
            }
            item
        })
        .collect();
    (page, last_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn keyed_items(count: usize) -> Vec<Record> {
        (0..count)
            .map(|n| {
                json!({"_key": format!("1/2/3/{}", n), "sku": n})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect()
    }

    /// Serves pages out of `items` the way the storage API does.
    fn page_server(
        items: Vec<Record>,
        page_size: usize,
        requests: Arc<AtomicUsize>,
    ) -> impl FnMut(Option<String>) -> futures::future::Ready<Result<Vec<Record>, PipelineError>>
    {
        move |start_after| {
            requests.fetch_add(1, Ordering::SeqCst);
            let start = match start_after {
                Some(key) => {
                    items
                        .iter()
                        .position(|item| item["_key"] == key.as_str())
                        .unwrap()
                        + 1
                }
                None => 0,
            };
            let page = items.iter().skip(start).take(page_size).cloned().collect();
            futures::future::ready(Ok(page))
        }
    }

    #[test]
    fn test_endpoint() {
        let client = ScrapyCloudClient::with_config(
            "key",
            SourceConfig {
                storage_url: "https://storage.example.com/".to_string(),
                page_size: 10,
            },
        )
        .unwrap();
        let job = JobId::parse("1/2/3").unwrap();

        assert_eq!(
            client.endpoint("items", &job),
            "https://storage.example.com/items/1/2/3"
        );
        assert_eq!(
            client.endpoint("jobs", &job),
            "https://storage.example.com/jobs/1/2/3"
        );
    }

    fn query_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_first_page_request() {
        let http = reqwest::Client::new();
        let request = page_request(
            &http,
            "https://storage.example.com/items/1/2/3",
            "abc123",
            100,
            None,
        )
        .build()
        .unwrap();

        assert_eq!(request.url().path(), "/items/1/2/3");
        assert_eq!(
            query_pairs(&request),
            vec![
                ("format".to_string(), "json".to_string()),
                ("meta".to_string(), "_key".to_string()),
                ("count".to_string(), "100".to_string()),
            ]
        );
        // "abc123:" in base64, the key as user name with an empty password
        assert_eq!(request.headers()["authorization"], "Basic YWJjMTIzOg==");
    }

    #[test]
    fn test_next_page_request_starts_after_key() {
        let http = reqwest::Client::new();
        let request = page_request(
            &http,
            "https://storage.example.com/items/1/2/3",
            "abc123",
            100,
            Some("1/2/3/99".to_string()),
        )
        .build()
        .unwrap();

        assert!(query_pairs(&request)
            .contains(&("startafter".to_string(), "1/2/3/99".to_string())));
    }

    #[test]
    fn test_metadata_request() {
        let client = ScrapyCloudClient::with_config(
            "abc123",
            SourceConfig {
                storage_url: "https://storage.example.com".to_string(),
                page_size: 10,
            },
        )
        .unwrap();
        let job = JobId::parse("1/2/3").unwrap();

        let request = client.metadata_request(&job).build().unwrap();

        assert_eq!(request.url().as_str(), "https://storage.example.com/jobs/1/2/3");
        assert_eq!(request.url().query(), None);
        assert_eq!(request.headers()["authorization"], "Basic YWJjMTIzOg==");
    }

    #[test]
    fn test_rejects_empty_api_key() {
        assert!(matches!(
            ScrapyCloudClient::new(" "),
            Err(PipelineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = SourceConfig {
            page_size: 0,
            ..SourceConfig::default()
        };
        assert!(matches!(
            ScrapyCloudClient::with_config("key", config),
            Err(PipelineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_strip_keys() {
        let (page, last_key) = strip_keys(keyed_items(3));

        assert_eq!(last_key.as_deref(), Some("1/2/3/2"));
        assert!(page.iter().all(|item| !item.contains_key("_key")));
        assert_eq!(page[1]["sku"], json!(1));
    }

    #[tokio::test]
    async fn test_paged_items_reads_every_page() {
        let requests = Arc::new(AtomicUsize::new(0));
        let stream = paged_items(4, page_server(keyed_items(10), 4, requests.clone()));

        let items: Vec<Record> = stream.try_collect().await.unwrap();

        assert_eq!(items.len(), 10);
        let skus: Vec<u64> = items.iter().map(|i| i["sku"].as_u64().unwrap()).collect();
        assert_eq!(skus, (0..10).collect::<Vec<u64>>());
        // 4 + 4 + 2, the short page ends the stream
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_paged_items_exact_multiple() {
        let requests = Arc::new(AtomicUsize::new(0));
        let stream = paged_items(5, page_server(keyed_items(10), 5, requests.clone()));

        let items: Vec<Record> = stream.try_collect().await.unwrap();

        assert_eq!(items.len(), 10);
        // the trailing empty page ends the stream
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_paged_items_is_lazy() {
        let requests = Arc::new(AtomicUsize::new(0));
        let mut stream = Box::pin(paged_items(
            2,
            page_server(keyed_items(6), 2, requests.clone()),
        ));
        assert_eq!(requests.load(Ordering::SeqCst), 0);

        stream.next().await.unwrap().unwrap();
        stream.next().await.unwrap().unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 1);

        stream.next().await.unwrap().unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_paged_items_missing_key() {
        let page: Vec<Record> = (0..2)
            .map(|n| json!({"sku": n}).as_object().cloned().unwrap())
            .collect();
        let stream = paged_items(2, move |_| {
            futures::future::ready(Ok::<_, PipelineError>(page.clone()))
        });

        let result: Result<Vec<Record>, _> = stream.try_collect().await;
        assert!(matches!(result, Err(PipelineError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_paged_items_propagates_fetch_error() {
        let stream = paged_items(2, |_| {
            futures::future::ready(Err::<Vec<Record>, _>(PipelineError::source("503")))
        });

        let result: Result<Vec<Record>, _> = stream.try_collect().await;
        assert!(matches!(result, Err(PipelineError::SourceError(_))));
    }
}
