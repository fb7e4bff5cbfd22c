//! Ranked node record

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

static PUBLIC_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G[A-Z0-9]{55}$").expect("static public key pattern"));

/// One entry in the ranking
///
/// Source files may carry `rank`, `ranking`, both or neither. They are
/// folded into a single `rank` at ingestion: explicit `rank` wins, then
/// explicit `ranking`. A zero counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NodeRecord")]
pub struct NodeRanking {
    /// Node public key
    pub public_key: String,
    /// ISO-8601 timestamp of last activity, empty when unknown
    pub last_active_date: String,
    /// Explicit rank from the source, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
}

/// Wire shape of a node record
///
/// Hand-edited source files drift: dates may be `null` and ranks may be
/// floats or strings. Only `public_key` is required.
#[derive(Deserialize)]
struct NodeRecord {
    public_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    last_active_date: String,
    #[serde(default)]
    rank: Option<Value>,
    #[serde(default)]
    ranking: Option<Value>,
}

impl From<NodeRecord> for NodeRanking {
    fn from(record: NodeRecord) -> Self {
        Self {
            public_key: record.public_key,
            last_active_date: record.last_active_date,
            rank: explicit_rank(record.rank.as_ref()).or_else(|| explicit_rank(record.ranking.as_ref())),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A positive whole number, from a JSON number or numeric string
///
/// Zero, negatives, fractions and anything non-numeric count as absent.
fn explicit_rank(value: Option<&Value>) -> Option<u64> {
    let rank = match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    rank.filter(|r| *r > 0)
}

impl NodeRanking {
    pub fn new(public_key: impl Into<String>, last_active_date: impl Into<String>, rank: Option<u64>) -> Self {
        Self {
            public_key: public_key.into(),
            last_active_date: last_active_date.into(),
            rank,
        }
    }

    /// Placeholder shown when a search finds nothing
    pub fn not_found(query: &str) -> Self {
        Self::new(query, "", Some(0))
    }

    /// Rank to display for this node at `position` (0-based) in the
    /// currently displayed slice.
    ///
    /// Without an explicit rank this is `position + 1`, so it depends on
    /// which slice the node is shown in, not on its place in the full list.
    pub fn display_rank(&self, position: usize) -> u64 {
        self.rank.unwrap_or(position as u64 + 1)
    }

    /// Shortened key for narrow output: first 8 and last 8 characters
    pub fn short_key(&self) -> String {
        let chars: Vec<char> = self.public_key.chars().collect();
        if chars.len() <= 16 {
            return self.public_key.clone();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", head, tail)
    }

    /// Whether the key looks like a well-formed public key
    pub fn has_valid_key(&self) -> bool {
        is_valid_public_key(&self.public_key)
    }
}

/// Loose format check: `G` followed by 55 characters of `[A-Z0-9]`.
///
/// Informational only. Lookup never rejects a query for failing it.
pub fn is_valid_public_key(key: &str) -> bool {
    PUBLIC_KEY_PATTERN.is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "GD3TEKP5DUPS4C2NKZD44HNVLTXJML64JSMQF537XEZDVQPVWNFUT7A4";

    fn parse(json: &str) -> NodeRanking {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rank_resolution_order() {
        let both = parse(r#"{"public_key":"A","last_active_date":"","rank":3,"ranking":7}"#);
        assert_eq!(both.rank, Some(3));

        let ranking_only = parse(r#"{"public_key":"A","last_active_date":"","ranking":7}"#);
        assert_eq!(ranking_only.rank, Some(7));

        let neither = parse(r#"{"public_key":"A","last_active_date":""}"#);
        assert_eq!(neither.rank, None);
    }

    #[test]
    fn test_zero_rank_counts_as_absent() {
        let node = parse(r#"{"public_key":"A","last_active_date":"","rank":0,"ranking":4}"#);
        assert_eq!(node.rank, Some(4));

        let node = parse(r#"{"public_key":"A","rank":0}"#);
        assert_eq!(node.rank, None);
        assert_eq!(node.last_active_date, "");
    }

    #[test]
    fn test_loose_record_fields() {
        let node = parse(r#"{"public_key":"A","last_active_date":null,"rank":2}"#);
        assert_eq!(node.last_active_date, "");
        assert_eq!(node.rank, Some(2));

        assert_eq!(parse(r#"{"public_key":"A","rank":1.0}"#).rank, Some(1));
        assert_eq!(parse(r#"{"public_key":"A","rank":"5"}"#).rank, Some(5));
        assert_eq!(parse(r#"{"public_key":"A","rank":2.5,"ranking":3}"#).rank, Some(3));
        assert_eq!(parse(r#"{"public_key":"A","rank":-4}"#).rank, None);
        assert_eq!(parse(r#"{"public_key":"A","rank":null,"ranking":true}"#).rank, None);
    }

    #[test]
    fn test_display_rank_falls_back_to_position() {
        let explicit = NodeRanking::new("A", "", Some(42));
        assert_eq!(explicit.display_rank(0), 42);

        let implicit = NodeRanking::new("A", "", None);
        assert_eq!(implicit.display_rank(0), 1);
        assert_eq!(implicit.display_rank(20), 21);
    }

    #[test]
    fn test_serialize_single_rank_field() {
        let json = serde_json::to_string(&NodeRanking::new("A", "2025-06-26T00:00:00.000Z", Some(1))).unwrap();
        assert_eq!(json, r#"{"public_key":"A","last_active_date":"2025-06-26T00:00:00.000Z","rank":1}"#);

        let json = serde_json::to_string(&NodeRanking::new("A", "", None)).unwrap();
        assert!(!json.contains("rank"));
    }

    #[test]
    fn test_public_key_format() {
        assert!(is_valid_public_key(KEY));
        assert!(!is_valid_public_key(&KEY[..20]));
        assert!(!is_valid_public_key(&KEY.to_lowercase()));
        assert!(!is_valid_public_key(&format!("X{}", &KEY[1..])));
    }

    #[test]
    fn test_short_key() {
        let node = NodeRanking::new(KEY, "", None);
        assert_eq!(node.short_key(), "GD3TEKP5...WNFUT7A4");
        assert_eq!(NodeRanking::new("SHORT", "", None).short_key(), "SHORT");
    }
}
