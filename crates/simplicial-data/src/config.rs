//! Dataset configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of a generated dataset and where its cache lives.
///
/// Everything except `root` and `load_graph` feeds the cache fingerprint, so
/// changing any of them regenerates the dataset instead of reusing a stale one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory holding `processed/`
    pub root: PathBuf,
    /// Dataset name, used in cache file names
    pub name: String,
    /// Approximate number of vertices per complex
    pub num_points: usize,
    pub train_samples: usize,
    pub val_samples: usize,
    /// Also keep the auxiliary graph in memory
    pub load_graph: bool,
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./datasets"),
            name: "flow".to_string(),
            num_points: 100,
            train_samples: 1000,
            val_samples: 200,
            load_graph: false,
            seed: 0,
        }
    }
}

impl DatasetConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset config {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing dataset config {}", path.display()))?;
        Ok(config)
    }

    pub fn num_samples(&self) -> usize {
        self.train_samples + self.val_samples
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }
}
