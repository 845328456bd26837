//! In-memory datasets backed by a verified on-disk cache.

use crate::cache::{self, sha256, CacheError};
use crate::config::DatasetConfig;
use crate::generator::ComplexGenerator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use simplicial_complex::Complex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A fully loaded list of complexes with split ids and an optional graph.
#[derive(Debug, Clone)]
pub struct InMemoryComplexDataset<G> {
    config: DatasetConfig,
    complexes: Vec<Complex>,
    graph: Option<G>,
    train_ids: Vec<usize>,
    val_ids: Vec<usize>,
    test_ids: Option<Vec<usize>>,
}

/// Cache-relevant part of a config, hashed into the cache directory name.
#[derive(Serialize)]
struct CacheKey<'a> {
    kind: &'a str,
    name: &'a str,
    num_points: usize,
    train_samples: usize,
    val_samples: usize,
    seed: u64,
    format: u32,
}

/// Hex SHA-256 prefix identifying `config` for `kind` generators.
pub fn fingerprint(kind: &str, config: &DatasetConfig) -> String {
    let key = CacheKey {
        kind,
        name: &config.name,
        num_points: config.num_points,
        train_samples: config.train_samples,
        val_samples: config.val_samples,
        seed: config.seed,
        format: cache::VERSION,
    };
    // Field order is fixed by the struct, so the encoding is stable.
    let encoded = serde_json::to_vec(&key).unwrap_or_default();
    sha256(&encoded)[..8]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// `(complex list, graph)` cache files for a configuration.
pub fn cache_paths(kind: &str, config: &DatasetConfig) -> (PathBuf, PathBuf) {
    let dir = config.processed_dir().join(fingerprint(kind, config));
    (
        dir.join(format!("{}_complex_list.cbor", config.name)),
        dir.join(format!("{}_graph.cbor", config.name)),
    )
}

impl<G: Serialize + DeserializeOwned> InMemoryComplexDataset<G> {
    /// Load from the cache, or generate and cache on a miss. A cache that
    /// fails verification is discarded and regenerated.
    pub fn load<Gen>(config: DatasetConfig, generator: &Gen) -> anyhow::Result<Self>
    where
        Gen: ComplexGenerator<Graph = G>,
    {
        let (list_path, graph_path) = cache_paths(generator.kind(), &config);

        let mut complexes = read_cached::<Vec<Complex>>(&list_path)
            .filter(|list| list.len() == config.num_samples());
        let mut graph = if config.load_graph {
            read_cached::<G>(&graph_path)
        } else {
            None
        };

        if complexes.is_none() || (config.load_graph && graph.is_none()) {
            info!(
                name = %config.name,
                kind = generator.kind(),
                samples = config.num_samples(),
                "generating dataset"
            );
            let generated = generator.generate(&config)?;
            anyhow::ensure!(
                generated.complexes.len() == config.num_samples(),
                "{} generator produced {} complexes, expected {}",
                generator.kind(),
                generated.complexes.len(),
                config.num_samples()
            );
            cache::write_file(&list_path, &generated.complexes)?;
            cache::write_file(&graph_path, &generated.graph)?;
            info!(path = %list_path.display(), "wrote dataset cache");

            complexes = Some(generated.complexes);
            graph = config.load_graph.then_some(generated.graph);
        }

        let complexes = complexes.unwrap_or_default();
        let train_ids = (0..config.train_samples).collect();
        let val_ids = (config.train_samples..config.num_samples()).collect();
        Ok(Self {
            config,
            complexes,
            graph,
            train_ids,
            val_ids,
            test_ids: None,
        })
    }
}

impl<G> InMemoryComplexDataset<G> {
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Complex> {
        self.complexes.get(id)
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    /// `None` unless the dataset was loaded with `load_graph`.
    pub fn graph(&self) -> Option<&G> {
        self.graph.as_ref()
    }

    pub fn train_ids(&self) -> &[usize] {
        &self.train_ids
    }

    pub fn val_ids(&self) -> &[usize] {
        &self.val_ids
    }

    pub fn test_ids(&self) -> Option<&[usize]> {
        self.test_ids.as_deref()
    }

    /// Complexes at `ids`, in order.
    pub fn split<'a>(&'a self, ids: &'a [usize]) -> anyhow::Result<Vec<&'a Complex>> {
        ids.iter()
            .map(|&id| {
                self.get(id).ok_or_else(|| {
                    anyhow::anyhow!("split id {id} out of range for {} complexes", self.len())
                })
            })
            .collect()
    }

    pub fn train(&self) -> anyhow::Result<Vec<&Complex>> {
        self.split(&self.train_ids)
    }

    pub fn val(&self) -> anyhow::Result<Vec<&Complex>> {
        self.split(&self.val_ids)
    }
}

fn read_cached<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match cache::read_file(path) {
        Ok(Some(value)) => {
            info!(path = %path.display(), "dataset cache hit");
            Some(value)
        }
        Ok(None) => {
            info!(path = %path.display(), "dataset cache miss");
            None
        }
        Err(err @ CacheError::Io(_)) => {
            warn!(path = %path.display(), error = %err, "dataset cache unreadable, regenerating");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "dataset cache invalid, regenerating");
            None
        }
    }
}
