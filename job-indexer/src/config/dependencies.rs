//! Dependency initialization and wiring for the job indexer.

use std::sync::Arc;
use tracing::{info, warn};

use super::IndexerSettings;
use crate::IndexingError;
use job_indexer_pipeline::{
    loader::LoaderConfig,
    orchestrator::{PipelineConfig, TransferPipeline},
    source::{ScrapyCloudClient, SourceConfig, DEFAULT_PAGE_SIZE},
};
use job_indexer_repository::{OpenSearchClient, SearchIndexClient, SearchIndexConfig};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The pipeline, with its index already recreated.
    pub pipeline: TransferPipeline,
}

impl Dependencies {
    /// Connect to both services and prepare the target index.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client cannot be built or index setup fails
    pub async fn new(settings: &IndexerSettings) -> Result<Self, IndexingError> {
        info!(
            job = %settings.job_id,
            sink_url = %settings.sink_url,
            storage_url = %settings.storage_url,
            "Initializing dependencies"
        );

        let source = ScrapyCloudClient::with_config(
            settings.api_key.clone(),
            SourceConfig {
                storage_url: settings.storage_url.clone(),
                page_size: DEFAULT_PAGE_SIZE,
            },
        )?;

        let search_client = OpenSearchClient::new(&settings.sink_url)
            .await?
            .with_legacy_doc_types(settings.legacy_doc_types)
            .with_flat_documents(settings.flat_documents);

        let sink = SearchIndexClient::with_config(
            Box::new(search_client),
            SearchIndexConfig::with_max_batch_size(settings.max_batch_size),
        );

        match sink.health_check().await {
            Ok(true) => info!("OpenSearch connection verified"),
            Ok(false) => warn!("OpenSearch cluster is not healthy"),
            Err(e) => warn!(error = %e, "OpenSearch health check failed"),
        }

        let config = PipelineConfig {
            index_name: settings.index_name.clone(),
            doc_type: settings.doc_type.clone(),
            loader: LoaderConfig::new(settings.base_batch_size, settings.max_batch_size),
        };

        let pipeline =
            TransferPipeline::initialize(Arc::new(source), sink, &settings.job_id, config).await?;

        Ok(Self { pipeline })
    }
}
