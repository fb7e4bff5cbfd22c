//! Public key lookup

use serde::{Deserialize, Serialize};

use crate::node::NodeRanking;

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched node, or a placeholder carrying the query on a miss
    pub node: NodeRanking,
    pub found: bool,
}

impl SearchResult {
    pub fn hit(node: NodeRanking) -> Self {
        Self { node, found: true }
    }

    pub fn miss(query: &str) -> Self {
        Self {
            node: NodeRanking::not_found(query),
            found: false,
        }
    }
}

/// Trim user input, rejecting blank queries
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// First node whose key equals `query` exactly
pub fn find_exact<'a>(entries: &'a [NodeRanking], query: &str) -> Option<&'a NodeRanking> {
    entries.iter().find(|node| node.public_key == query)
}

/// First node whose key contains `query`, ignoring case
pub fn find_substring<'a>(entries: &'a [NodeRanking], query: &str) -> Option<&'a NodeRanking> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .find(|node| node.public_key.to_lowercase().contains(&needle))
}

/// Look up `query` among `entries`
///
/// An exact match anywhere in the list beats any substring match. Ties go
/// to the earliest node in list order. The query is used as given; callers
/// trim and reject blank input with [`normalize_query`].
pub fn search(entries: &[NodeRanking], query: &str) -> SearchResult {
    find_exact(entries, query)
        .or_else(|| find_substring(entries, query))
        .cloned()
        .map(SearchResult::hit)
        .unwrap_or_else(|| SearchResult::miss(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, rank: u64) -> NodeRanking {
        NodeRanking::new(key, "2025-06-26T00:00:00.000Z", Some(rank))
    }

    fn entries() -> Vec<NodeRanking> {
        vec![
            node("GABCDEF", 1),
            node("GXYZ", 2),
            node("GAB", 3),
            node("GQRSTUV", 4),
        ]
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let result = search(&entries(), "GAB");
        assert!(result.found);
        assert_eq!(result.node.rank, Some(3));
    }

    #[test]
    fn test_substring_is_case_insensitive_first_in_order() {
        let result = search(&entries(), "ab");
        assert!(result.found);
        assert_eq!(result.node.public_key, "GABCDEF");

        let result = search(&entries(), "stu");
        assert_eq!(result.node.public_key, "GQRSTUV");
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let result = search(&entries(), "gxyz");
        assert!(result.found);
        assert_eq!(result.node.public_key, "GXYZ");
        assert!(find_exact(&entries(), "gxyz").is_none());
    }

    #[test]
    fn test_miss_returns_placeholder() {
        let result = search(&entries(), "NOPE");
        assert!(!result.found);
        assert_eq!(result.node.public_key, "NOPE");
        assert_eq!(result.node.last_active_date, "");
        assert_eq!(result.node.rank, Some(0));
    }

    #[test]
    fn test_duplicates_resolve_to_first() {
        let list = vec![node("GDUP", 1), node("GDUP", 2)];
        assert_eq!(search(&list, "GDUP").node.rank, Some(1));
        assert_eq!(search(&list, "dup").node.rank, Some(1));
    }

    #[test]
    fn test_query_not_trimmed_inside_engine() {
        assert!(!search(&entries(), " GXYZ").found);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  GABC \n"), Some("GABC"));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }
}
