//! What a surface should show for a (page, view, search) request

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::constants::{ITEMS_PER_PAGE, TOP_COUNT};
use crate::dataset::{DatasetStats, RankingDataset};
use crate::lookup::{normalize_query, search, SearchResult};
use crate::node::NodeRanking;
use crate::pagination::{clamp_page, paginate, visible_pages, PageToken};

/// Which list to show when no search is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// First ten nodes
    #[default]
    Top10,
    /// Every node, paged
    All,
}

impl View {
    /// Lenient parse: anything other than `all` is the top view
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top10" => Ok(View::Top10),
            "all" => Ok(View::All),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Top10 => write!(f, "top10"),
            View::All => write!(f, "all"),
        }
    }
}

/// A node together with the rank to display for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedNode {
    #[serde(flatten)]
    pub node: NodeRanking,
    pub display_rank: u64,
}

/// A resolved request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// Requested page, at least 1
    pub page: u64,
    pub view: View,
    /// Trimmed search text, empty for none
    pub search: String,
    pub items_per_page: usize,
    pub top_count: usize,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            page: 1,
            view: View::Top10,
            search: String::new(),
            items_per_page: ITEMS_PER_PAGE,
            top_count: TOP_COUNT,
        }
    }
}

impl ListingRequest {
    /// Build from raw query parameters
    ///
    /// The page is read from its leading digits (`2abc` and `2.5` are page
    /// 2). A missing, non-numeric or non-positive page becomes 1. The
    /// search text is trimmed.
    pub fn from_params(page: Option<&str>, view: Option<&str>, search: Option<&str>) -> Self {
        let page = page.map(leading_int).unwrap_or(0).max(1) as u64;

        Self {
            page,
            view: view.map(View::parse_lenient).unwrap_or_default(),
            search: search.and_then(normalize_query).unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Take page size and top count from configuration
    pub fn with_layout(mut self, config: &RankingConfig) -> Self {
        self.items_per_page = config.items_per_page;
        self.top_count = config.top_count;
        self
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Integer prefix of `s` after leading whitespace and an optional sign;
/// 0 when there is none. Saturates instead of overflowing.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// What to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Listing {
    /// A search took precedence over the view
    Search {
        stats: DatasetStats,
        result: SearchResult,
        display_rank: u64,
        key_format_valid: bool,
    },
    /// The top view
    Top {
        stats: DatasetStats,
        nodes: Vec<RankedNode>,
    },
    /// One page of the full list
    Paged {
        stats: DatasetStats,
        nodes: Vec<RankedNode>,
        page: u64,
        total_pages: u64,
        start_index: usize,
        end_index: usize,
        total_items: usize,
        has_previous_page: bool,
        has_next_page: bool,
        window: Vec<PageToken>,
    },
}

impl Listing {
    pub fn stats(&self) -> &DatasetStats {
        match self {
            Listing::Search { stats, .. } | Listing::Top { stats, .. } | Listing::Paged { stats, .. } => stats,
        }
    }
}

fn ranked(nodes: &[NodeRanking], offset: usize) -> Vec<RankedNode> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| RankedNode {
            node: node.clone(),
            display_rank: node.display_rank(offset + i),
        })
        .collect()
}

/// Resolve `request` against `dataset`
///
/// A non-empty search wins over the view. The paged view clamps the page
/// into `[1, max(total_pages, 1)]` before slicing.
pub fn build_listing(dataset: &RankingDataset, request: &ListingRequest) -> Listing {
    let stats = DatasetStats {
        total_pages: crate::pagination::total_pages(dataset.node_count(), request.items_per_page),
        ..dataset.stats()
    };

    if request.has_search() {
        let result = search(&dataset.entries, &request.search);
        return Listing::Search {
            stats,
            display_rank: result.node.display_rank(0),
            key_format_valid: crate::node::is_valid_public_key(&request.search),
            result,
        };
    }

    match request.view {
        View::Top10 => Listing::Top {
            stats,
            nodes: ranked(dataset.top(request.top_count), 0),
        },
        View::All => {
            let page_number = clamp_page(request.page, stats.total_pages);
            let page = paginate(&dataset.entries, request.items_per_page, page_number);
            Listing::Paged {
                nodes: ranked(page.items, page.start_index),
                page: page.page,
                total_pages: page.total_pages,
                start_index: page.start_index,
                end_index: page.end_index,
                total_items: page.total_items,
                has_previous_page: page.has_previous_page(),
                has_next_page: page.has_next_page(),
                window: visible_pages(page.page, page.total_pages),
                stats,
            }
        }
    }
}
