//! Ranking configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{ITEMS_PER_PAGE, TOP_COUNT};

/// Where to look for the dataset and how to slice it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Dataset files, tried in order
    pub data_candidates: Vec<PathBuf>,
    /// Nodes per page in the paged view
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Nodes in the top view
    #[serde(default = "default_top_count")]
    pub top_count: usize,
}

fn default_items_per_page() -> usize {
    ITEMS_PER_PAGE
}

fn default_top_count() -> usize {
    TOP_COUNT
}

impl RankingConfig {
    /// Standard candidate layout under a base directory
    ///
    /// ```text
    /// base_dir/
    ///   data/nodes_ranking.json
    ///   assets/nodes_ranking.json
    ///   src/data/nodes_ranking.json
    ///   data/backup_nodes.json
    /// ```
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base = base_dir.into();

        Self {
            data_candidates: vec![
                base.join("data").join("nodes_ranking.json"),
                base.join("assets").join("nodes_ranking.json"),
                base.join("src").join("data").join("nodes_ranking.json"),
                base.join("data").join("backup_nodes.json"),
            ],
            items_per_page: ITEMS_PER_PAGE,
            top_count: TOP_COUNT,
        }
    }

    /// Use a single dataset file
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_candidates = vec![path.into()];
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self::from_base_dir(".")
    }
}
