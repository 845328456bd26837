//! Raw dataset generators.

use crate::config::DatasetConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use simplicial_complex::Complex;

/// Everything a generator produces for one configuration.
#[derive(Debug, Clone)]
pub struct Generated<G> {
    /// Training samples first, then validation samples.
    pub complexes: Vec<Complex>,
    pub graph: G,
}

/// Produces the complexes of a dataset from scratch. Datasets call this only
/// when no valid cache exists for the configuration.
pub trait ComplexGenerator {
    /// Auxiliary graph stored alongside the complexes. Opaque to message
    /// passing.
    type Graph: Serialize + DeserializeOwned;

    /// Stable identifier mixed into the cache fingerprint.
    fn kind(&self) -> &'static str;

    fn generate(&self, config: &DatasetConfig) -> anyhow::Result<Generated<Self::Graph>>;
}
