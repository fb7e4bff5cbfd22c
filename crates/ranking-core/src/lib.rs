//! ranking-core: Node ranking data model, loading, lookup and pagination
//!
//! This crate holds everything both surfaces share:
//! - Loader: resolves a ranked node list from a fixed list of candidate
//!   files, falling back to a built-in two-node dataset
//! - Lookup: exact public key match first, then case-insensitive substring
//! - Pagination: fixed-size slices plus the compact page-number window
//! - Listing: turns a (page, view, search) request into what to display
//! - Session: in-memory view/search/page state for the client surface
//!
//! ## Data flow
//!
//! ```text
//! loader -> (cache) -> { lookup, pagination } -> listing -> presentation
//! ```
//!
//! Nothing writes back to a loaded dataset. A refresh builds a new one.

mod config;
mod dataset;
mod error;
mod listing;
mod loader;
mod lookup;
mod node;
mod pagination;
mod session;

pub use config::RankingConfig;
pub use dataset::{DatasetStats, RankingDataset};
pub use error::Error;
pub use listing::{build_listing, Listing, ListingRequest, RankedNode, View};
pub use loader::{parse_payload, DatasetOrigin, DatasetSource, FileLoader, RANKING_KEYS};
pub use lookup::{find_exact, find_substring, normalize_query, search, SearchResult};
pub use node::{is_valid_public_key, NodeRanking};
pub use pagination::{clamp_page, paginate, total_pages, visible_pages, Page, PageToken};
pub use session::BrowseSession;

pub type Result<T> = std::result::Result<T, Error>;

/// Constants shared by both surfaces
pub mod constants {
    /// Nodes per page in the paged view
    pub const ITEMS_PER_PAGE: usize = 20;

    /// Nodes shown in the top view
    pub const TOP_COUNT: usize = 10;

    /// Pages shown on each side of the current page in the page window
    pub const PAGE_WINDOW_RADIUS: u64 = 2;

    /// Length of a public key after the leading `G`
    pub const PUBLIC_KEY_BODY_LEN: usize = 55;
}
