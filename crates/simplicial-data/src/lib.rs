//! Datasets of simplicial complexes.
//!
//! A dataset is produced once by a [`ComplexGenerator`], written to a
//! verified CBOR cache under `root/processed/<fingerprint>/`, and served from
//! memory afterwards together with its train/validation split ids.
//!
//! ## Module Organization
//!
//! - `config`: [`DatasetConfig`], loadable from JSON
//! - `cache`: the checksummed on-disk format
//! - `generator`, `dataset`: generation and the in-memory dataset
//! - `flow`: lattice edge-flow classification

pub mod cache;
pub mod config;
pub mod dataset;
pub mod flow;
pub mod generator;

pub use cache::CacheError;
pub use config::DatasetConfig;
pub use dataset::{cache_paths, fingerprint, InMemoryComplexDataset};
pub use flow::{load_flow_dataset, FlowDataset, FlowGenerator, LatticeGraph, NUM_CLASSES};
pub use generator::{ComplexGenerator, Generated};
