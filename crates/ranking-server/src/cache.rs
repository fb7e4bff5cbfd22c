//! In-memory dataset cache with coalesced loading
//!
//! One slot holds the last loaded dataset. Callers that arrive while a load
//! is running attach to the same shared future instead of starting another
//! load. Reads of a populated slot never block.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use ranking_core::{DatasetSource, RankingDataset};
use serde::{Deserialize, Serialize};

use crate::metrics;

type LoadFuture = Shared<BoxFuture<'static, Arc<RankingDataset>>>;

/// Snapshot of the cache for status endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    pub cached: bool,
    pub node_count: usize,
}

struct InFlight {
    generation: u64,
    future: LoadFuture,
}

struct CacheInner {
    source: Arc<dyn DatasetSource>,
    slot: ArcSwapOption<RankingDataset>,
    in_flight: Mutex<Option<InFlight>>,
    /// Bumped by every invalidation; a load only fills the slot if the
    /// generation it started under is still current
    generation: AtomicU64,
}

/// Dataset cache shared by the JSON routes
#[derive(Clone)]
pub struct DatasetCache {
    inner: Arc<CacheInner>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                source,
                slot: ArcSwapOption::empty(),
                in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Cached dataset, loading it first if the slot is empty
    pub async fn get_or_load(&self) -> Arc<RankingDataset> {
        if let Some(dataset) = self.inner.slot.load_full() {
            metrics::record_cache_hit();
            return dataset;
        }

        let future = {
            let mut in_flight = self.inner.in_flight.lock();

            // Another load may have finished between the check and the lock
            if let Some(dataset) = self.inner.slot.load_full() {
                metrics::record_cache_hit();
                return dataset;
            }

            match in_flight.as_ref() {
                Some(pending) => {
                    metrics::record_cache_coalesced();
                    pending.future.clone()
                }
                None => {
                    metrics::record_cache_miss();
                    let generation = self.inner.generation.load(Ordering::SeqCst);
                    let future = load_future(self.inner.clone(), generation);
                    *in_flight = Some(InFlight {
                        generation,
                        future: future.clone(),
                    });
                    future
                }
            }
        };

        future.await
    }

    /// Drop the cached dataset; the next `get_or_load` reloads from source
    pub fn invalidate(&self) {
        let mut in_flight = self.inner.in_flight.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.slot.store(None);
        *in_flight = None;
        metrics::set_cache_populated(false);
        tracing::info!("Dataset cache cleared");
    }

    /// Invalidate and load again
    pub async fn refresh(&self) -> Arc<RankingDataset> {
        let start = Instant::now();
        self.invalidate();
        let dataset = self.get_or_load().await;
        metrics::record_refresh(start.elapsed());
        dataset
    }

    /// Current dataset without triggering a load
    pub fn peek(&self) -> Option<Arc<RankingDataset>> {
        self.inner.slot.load_full()
    }

    pub fn status(&self) -> CacheStatus {
        let current = self.inner.slot.load_full();
        CacheStatus {
            cached: current.is_some(),
            node_count: current.as_ref().map(|d| d.node_count()).unwrap_or(0),
        }
    }
}

fn load_future(inner: Arc<CacheInner>, generation: u64) -> LoadFuture {
    async move {
        let start = Instant::now();
        let source = inner.source.clone();

        let (dataset, origin_is_fallback) =
            match tokio::task::spawn_blocking(move || source.load_with_origin()).await {
                Ok((dataset, origin)) => (dataset, origin.is_fallback()),
                Err(e) => {
                    tracing::error!(error = %e, "Dataset load task failed, using fallback data");
                    (RankingDataset::fallback(), true)
                }
            };

        let source_label = if origin_is_fallback {
            metrics::SOURCE_FALLBACK
        } else {
            metrics::SOURCE_FILE
        };
        metrics::record_dataset_load(source_label, dataset.node_count(), start.elapsed());

        let dataset = Arc::new(dataset);

        let mut in_flight = inner.in_flight.lock();
        if inner.generation.load(Ordering::SeqCst) == generation {
            inner.slot.store(Some(dataset.clone()));
            metrics::set_cache_populated(true);
            tracing::info!(
                entries = dataset.node_count(),
                fallback = origin_is_fallback,
                "Dataset cached"
            );
        } else {
            tracing::debug!("Discarding dataset from a load that predates invalidation");
        }
        if in_flight.as_ref().is_some_and(|p| p.generation == generation) {
            *in_flight = None;
        }

        dataset
    }
    .boxed()
    .shared()
}
