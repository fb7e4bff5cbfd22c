//! ranking-server: Pi node ranking over HTTP
//!
//! Two surfaces over the same dataset:
//! - `GET /` renders HTML and reads the dataset fresh on every request
//! - `/api/*` serves JSON from an in-memory cache that loads once and is
//!   refreshed on demand

pub mod cache;
pub mod error;
pub mod metrics;
pub mod render;
pub mod routes;
pub mod server;
pub mod state;

pub use cache::{CacheStatus, DatasetCache};
pub use error::ServerError;
pub use routes::{create_router, RefreshResult, SearchResponse};
pub use server::{RankingServer, ServerBuilder};
pub use state::{create_shared_state, AppState, ServerStats, SharedState};
