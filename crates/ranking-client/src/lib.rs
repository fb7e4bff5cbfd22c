//! ranking-client: terminal client for the ranking server
//!
//! Fetches the whole dataset once, then browses and searches it locally
//! with [`ranking_core::BrowseSession`], the same way a single-page app
//! would.

pub mod client;
pub mod error;
pub mod feed;

pub use client::{CacheStatus, ClientBuilder, RankingClient, RefreshSummary, SearchResponse};
pub use error::ClientError;
pub use feed::RankingFeed;
