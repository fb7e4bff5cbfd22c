//! Client-side dataset holder
//!
//! Starts from the built-in fallback dataset and replaces it with whatever
//! the server returns. A failed fetch never clears what is already shown:
//! the error is kept for display until dismissed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ranking_core::RankingDataset;

use crate::client::RankingClient;
use crate::error::Result;

pub struct RankingFeed {
    client: RankingClient,
    data: Arc<RankingDataset>,
    error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
}

impl RankingFeed {
    pub fn new(client: RankingClient) -> Self {
        Self {
            client,
            data: Arc::new(RankingDataset::fallback()),
            error: None,
            last_fetched: None,
        }
    }

    /// Currently displayed dataset
    pub fn data(&self) -> Arc<RankingDataset> {
        self.data.clone()
    }

    /// Error from the last fetch, if it failed and was not dismissed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// When data was last fetched successfully
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    /// Fetch the dataset; with `force_refresh` the server reloads first.
    ///
    /// Returns whether new data was installed.
    pub async fn fetch(&mut self, force_refresh: bool) -> bool {
        self.error = None;

        let result = self.load(force_refresh).await;
        match result {
            Ok(dataset) => {
                tracing::info!(nodes = dataset.node_count(), "Fetched ranking dataset");
                self.data = Arc::new(dataset);
                self.last_fetched = Some(Utc::now());
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch ranking data, keeping current data");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    async fn load(&self, force_refresh: bool) -> Result<RankingDataset> {
        if force_refresh {
            let summary = self.client.refresh().await?;
            tracing::info!(nodes = summary.node_count, "Server reloaded dataset");
        }
        self.client.fetch_dataset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientBuilder;

    #[tokio::test]
    async fn test_failed_fetch_keeps_fallback_and_reports() {
        // Port 9 (discard) is not expected to be listening
        let client = ClientBuilder::new("http://127.0.0.1:9").build().unwrap();
        let mut feed = RankingFeed::new(client);
        let before = feed.data();

        assert!(!feed.fetch(true).await);
        assert!(feed.error().is_some());
        assert!(Arc::ptr_eq(&before, &feed.data()));
        assert_eq!(feed.data().node_count(), 2);
        assert!(feed.last_fetched().is_none());

        feed.dismiss_error();
        assert!(feed.error().is_none());
    }
}
