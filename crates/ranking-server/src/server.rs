//! Ranking server implementation

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusHandle;
use ranking_core::RankingConfig;
use tokio::net::TcpListener;

use crate::error::{Result, ServerError};
use crate::routes::create_router;
use crate::state::{AppState, SharedState};

/// Ranking server
pub struct RankingServer {
    state: SharedState,
    addr: SocketAddr,
}

impl RankingServer {
    /// Create a new server with the given state
    pub fn new(state: AppState, addr: SocketAddr) -> Self {
        Self {
            state: SharedState::new(state),
            addr,
        }
    }

    /// Fill the cache before accepting requests
    pub async fn warm_cache(&self) {
        let dataset = self.state.cache.get_or_load().await;
        tracing::info!(entries = dataset.node_count(), "Cache warmed");
    }

    /// Run the server
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);

        tracing::info!("Starting ranking server on {}", self.addr);

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get the server state for testing
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Builder for RankingServer
pub struct ServerBuilder {
    config: RankingConfig,
    addr: SocketAddr,
    metrics: Option<PrometheusHandle>,
    warm_cache: bool,
}

impl ServerBuilder {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            config,
            addr: ([127, 0, 0, 1], 3000).into(),
            metrics: None,
            warm_cache: true,
        }
    }

    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.addr = ([0, 0, 0, 0], port).into();
        self
    }

    pub fn metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Leave the cache empty until the first request (useful for testing)
    pub fn skip_warm(mut self) -> Self {
        self.warm_cache = false;
        self
    }

    pub async fn build(self) -> RankingServer {
        let mut state = AppState::new(self.config);
        if let Some(handle) = self.metrics {
            state = state.with_metrics(handle);
        }

        let server = RankingServer::new(state, self.addr);
        if self.warm_cache {
            server.warm_cache().await;
        }

        server
    }
}
