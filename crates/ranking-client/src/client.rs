//! HTTP client for the ranking server's JSON routes

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use ranking_core::{normalize_query, NodeRanking, RankingDataset, SearchResult};

use crate::error::{ClientError, Result};

/// Response from the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub result: SearchResult,
    pub key_format_valid: bool,
    pub searched: usize,
}

/// Response from the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub node_count: usize,
    pub total_pages: u64,
    pub last_updated_at: String,
    pub refresh_duration_ms: u64,
}

/// Response from the cache status endpoint
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheStatus {
    pub cached: bool,
    pub node_count: usize,
}

/// Client for one ranking server
#[derive(Debug, Clone)]
pub struct RankingClient {
    http: Client,
    server_url: String,
}

impl RankingClient {
    /// Create a new client for `server_url`
    pub fn new(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Fetch the full dataset from the server's cache
    pub async fn fetch_dataset(&self) -> Result<RankingDataset> {
        self.get_json("/api/ranking", &[]).await
    }

    /// Ask the server to drop its cache and reload
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let url = format!("{}/api/refresh", self.server_url);
        let resp = self.http.post(&url).send().await?;
        Self::decode(resp).await
    }

    /// Server-side lookup; blank queries are rejected before sending
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let query = normalize_query(query)
            .ok_or_else(|| ClientError::InvalidInput("search query must not be blank".to_string()))?;
        self.get_json("/api/search", &[("q", query.to_string())]).await
    }

    /// Nodes with an explicit rank in `start..=end`
    pub async fn rank_range(&self, start: u64, end: u64) -> Result<Vec<NodeRanking>> {
        self.get_json(
            "/api/rank-range",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    pub async fn cache_status(&self) -> Result<CacheStatus> {
        self.get_json("/api/cache", &[]).await
    }

    pub async fn health(&self) -> bool {
        let url = format!("{}/live", self.server_url);
        self.http
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.server_url, path);
        tracing::debug!(url = %url, "GET");
        let resp = self.http.get(&url).query(query).send().await?;
        Self::decode(resp).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        if !resp.status().is_success() {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Builder for RankingClient
pub struct ClientBuilder {
    server_url: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            timeout: None,
        }
    }

    /// Per-request timeout; none by default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<RankingClient> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        Ok(RankingClient::new(http.build()?, self.server_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ClientBuilder::new("http://localhost:3000/").build().unwrap();
        assert_eq!(client.server_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_blank_search_rejected_locally() {
        let client = ClientBuilder::new("http://127.0.0.1:9").build().unwrap();
        let err = client.search("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn test_search_response_decodes() {
        let json = r#"{"node":{"public_key":"GABC","last_active_date":"","rank":4},"found":true,"key_format_valid":false,"searched":10}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(resp.result.found);
        assert_eq!(resp.result.node.rank, Some(4));
        assert_eq!(resp.searched, 10);
    }
}
