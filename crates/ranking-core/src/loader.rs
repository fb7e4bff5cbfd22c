//! Dataset loader: candidate files with a built-in fallback

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::RankingConfig;
use crate::constants::ITEMS_PER_PAGE;
use crate::dataset::{now_timestamp, RankingDataset};
use crate::error::Error;
use crate::node::NodeRanking;
use crate::pagination::total_pages;
use crate::Result;

/// Keys accepted for the ranked list inside a wrapped payload, in the
/// order they are tried
pub const RANKING_KEYS: [&str; 3] = ["xếp hạng", "entries", "ranking"];

/// Where a loaded dataset came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOrigin {
    File(PathBuf),
    Fallback,
}

impl DatasetOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DatasetOrigin::Fallback)
    }
}

/// Something that can produce a dataset
///
/// Loading never fails: implementations degrade to
/// [`RankingDataset::fallback`] instead.
pub trait DatasetSource: Send + Sync {
    fn load_with_origin(&self) -> (RankingDataset, DatasetOrigin);

    fn load(&self) -> RankingDataset {
        self.load_with_origin().0
    }
}

/// Loads the first readable candidate file
#[derive(Debug, Clone)]
pub struct FileLoader {
    candidates: Vec<PathBuf>,
    items_per_page: usize,
}

impl FileLoader {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            items_per_page: ITEMS_PER_PAGE,
        }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self {
            candidates: config.data_candidates.clone(),
            items_per_page: config.items_per_page,
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Read and parse a single candidate
    pub fn try_candidate(&self, path: &Path) -> Result<RankingDataset> {
        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        parse_payload_with(value, self.items_per_page)
    }
}

impl DatasetSource for FileLoader {
    fn load_with_origin(&self) -> (RankingDataset, DatasetOrigin) {
        for path in &self.candidates {
            match self.try_candidate(path) {
                Ok(dataset) => {
                    info!(
                        path = %path.display(),
                        entries = dataset.node_count(),
                        "Loaded ranking dataset"
                    );
                    return (dataset, DatasetOrigin::File(path.clone()));
                }
                Err(Error::SourceNotFound(_)) => {
                    debug!(path = %path.display(), "Dataset candidate not present");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping dataset candidate");
                }
            }
        }

        warn!(
            candidates = self.candidates.len(),
            "No usable dataset source, using fallback data"
        );
        (RankingDataset::fallback(), DatasetOrigin::Fallback)
    }
}

/// Normalize a parsed payload into a dataset
///
/// Accepts either an object with a ranked-list field (see
/// [`RANKING_KEYS`]) or a bare array of node records.
pub fn parse_payload(value: Value) -> Result<RankingDataset> {
    parse_payload_with(value, ITEMS_PER_PAGE)
}

fn parse_payload_with(value: Value, items_per_page: usize) -> Result<RankingDataset> {
    match value {
        Value::Object(mut map) => {
            let list = RANKING_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(list @ Value::Array(_)) => Some(list),
                    _ => None,
                })
                .ok_or_else(|| Error::InvalidPayload("object without a ranking list".to_string()))?;

            let entries: Vec<NodeRanking> = serde_json::from_value(list)?;
            let total_pages = map
                .get("total_pages")
                .and_then(Value::as_u64)
                .filter(|p| *p > 0)
                .unwrap_or_else(|| total_pages(entries.len(), items_per_page));
            let last_updated_at = map
                .get("last_updated_at")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(now_timestamp);

            Ok(RankingDataset {
                entries,
                total_pages,
                last_updated_at,
            })
        }
        Value::Array(_) => {
            let entries: Vec<NodeRanking> = serde_json::from_value(value)?;
            Ok(RankingDataset {
                total_pages: total_pages(entries.len(), items_per_page),
                entries,
                last_updated_at: now_timestamp(),
            })
        }
        other => Err(Error::InvalidPayload(format!(
            "expected object or array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
