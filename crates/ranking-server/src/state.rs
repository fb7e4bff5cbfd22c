//! Server state: configuration, dataset source and cache

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use ranking_core::{DatasetSource, FileLoader, ListingRequest, RankingConfig, RankingDataset};
use serde::Serialize;

use crate::cache::{CacheStatus, DatasetCache};

/// State shared by every route
pub struct AppState {
    /// Candidate files and page layout
    pub config: RankingConfig,
    /// Where datasets come from
    pub source: Arc<dyn DatasetSource>,
    /// Cache behind the JSON routes
    pub cache: DatasetCache,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State reading datasets from the configured candidate files
    pub fn new(config: RankingConfig) -> Self {
        let source: Arc<dyn DatasetSource> = Arc::new(FileLoader::from_config(&config));
        Self::with_source(config, source)
    }

    /// State over an arbitrary dataset source
    pub fn with_source(config: RankingConfig, source: Arc<dyn DatasetSource>) -> Self {
        Self {
            config,
            cache: DatasetCache::new(source.clone()),
            source,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Load straight from source, bypassing the cache
    ///
    /// Used by the server-rendered page, which reads the dataset on every
    /// request.
    pub async fn load_uncached(&self) -> RankingDataset {
        let source = self.source.clone();
        match tokio::task::spawn_blocking(move || source.load()).await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(error = %e, "Dataset load task failed, using fallback data");
                RankingDataset::fallback()
            }
        }
    }

    /// Request template carrying the configured page layout
    pub fn listing_request(&self, page: Option<&str>, view: Option<&str>, search: Option<&str>) -> ListingRequest {
        ListingRequest::from_params(page, view, search).with_layout(&self.config)
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            cache: self.cache.status(),
            candidates: self.config.data_candidates.len(),
            metrics_enabled: self.metrics.is_some(),
        }
    }
}

/// Server statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct ServerStats {
    pub cache: CacheStatus,
    pub candidates: usize,
    pub metrics_enabled: bool,
}

/// Shared server state type
pub type SharedState = Arc<AppState>;

/// Create shared state from config
pub fn create_shared_state(config: RankingConfig) -> SharedState {
    Arc::new(AppState::new(config))
}
