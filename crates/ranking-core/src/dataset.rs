//! Loaded ranking dataset

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ITEMS_PER_PAGE;
use crate::node::NodeRanking;
use crate::pagination::total_pages;

/// The full ranked list plus its metadata
///
/// Built once per load and never mutated afterwards. Consumers hold it
/// behind an `Arc` and a refresh swaps in a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingDataset {
    /// Nodes in rank order
    #[serde(alias = "xếp hạng", alias = "ranking")]
    pub entries: Vec<NodeRanking>,
    /// Page count at 20 nodes per page
    pub total_pages: u64,
    /// RFC 3339 timestamp of the data
    pub last_updated_at: String,
}

/// Summary figures shown above every listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub node_count: usize,
    pub total_pages: u64,
    pub last_updated_at: String,
}

impl RankingDataset {
    /// Wrap a bare node list, deriving page count and timestamp
    pub fn from_entries(entries: Vec<NodeRanking>) -> Self {
        let total_pages = total_pages(entries.len(), ITEMS_PER_PAGE);
        Self {
            entries,
            total_pages,
            last_updated_at: now_timestamp(),
        }
    }

    /// Built-in dataset used when no source can be read
    pub fn fallback() -> Self {
        Self {
            entries: vec![
                NodeRanking::new(
                    "GD3TEKP5DUPS4C2NKZD44HNVLTXJML64JSMQF537XEZDVQPVWNFUT7A4",
                    "2025-06-26T00:00:00.000Z",
                    Some(1),
                ),
                NodeRanking::new(
                    "GAR6635PRQPUZZL6QL2HTFIMOGZW5MZ5GIJ5ZDNMQM7PFDHQQQNLSACK",
                    "2025-06-26T00:00:00.000Z",
                    Some(2),
                ),
            ],
            total_pages: 1,
            last_updated_at: now_timestamp(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First `n` nodes in list order
    pub fn top(&self, n: usize) -> &[NodeRanking] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Nodes whose explicit rank lies in `start..=end`
    ///
    /// Nodes without an explicit rank are treated as rank 0.
    pub fn nodes_in_rank_range(&self, start: u64, end: u64) -> Vec<NodeRanking> {
        self.entries
            .iter()
            .filter(|node| {
                let rank = node.rank.unwrap_or(0);
                rank >= start && rank <= end
            })
            .cloned()
            .collect()
    }

    /// Stats recomputed from the entries, independent of the stored
    /// `total_pages`
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            node_count: self.entries.len(),
            total_pages: total_pages(self.entries.len(), ITEMS_PER_PAGE),
            last_updated_at: self.last_updated_at.clone(),
        }
    }
}

/// Current time as RFC 3339 with millisecond precision and a `Z` suffix
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<NodeRanking> {
        (0..n)
            .map(|i| NodeRanking::new(format!("KEY{}", i), "", Some(i as u64 + 1)))
            .collect()
    }

    #[test]
    fn test_from_entries_derives_pages() {
        let dataset = RankingDataset::from_entries(nodes(41));
        assert_eq!(dataset.total_pages, 3);
        assert!(dataset.last_updated_at.ends_with('Z'));

        let empty = RankingDataset::from_entries(Vec::new());
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_fallback_has_two_nodes() {
        let dataset = RankingDataset::fallback();
        assert_eq!(dataset.node_count(), 2);
        assert_eq!(dataset.total_pages, 1);
        assert!(dataset.entries.iter().all(|n| n.has_valid_key()));
    }

    #[test]
    fn test_top_is_bounded() {
        let dataset = RankingDataset::from_entries(nodes(4));
        assert_eq!(dataset.top(10).len(), 4);
        assert_eq!(dataset.top(2)[1].public_key, "KEY1");
    }

    #[test]
    fn test_rank_range() {
        let mut entries = nodes(5);
        entries.push(NodeRanking::new("UNRANKED", "", None));
        let dataset = RankingDataset::from_entries(entries);

        let keys: Vec<_> = dataset
            .nodes_in_rank_range(2, 4)
            .into_iter()
            .map(|n| n.public_key)
            .collect();
        assert_eq!(keys, vec!["KEY1", "KEY2", "KEY3"]);

        let zero = dataset.nodes_in_rank_range(0, 0);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].public_key, "UNRANKED");
    }

    #[test]
    fn test_vietnamese_key_alias() {
        let json = r#"{"xếp hạng":[{"public_key":"A","last_active_date":""}],"total_pages":1,"last_updated_at":"x"}"#;
        let dataset: RankingDataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.node_count(), 1);

        let out = serde_json::to_value(&dataset).unwrap();
        assert!(out.get("entries").is_some());
    }
}
