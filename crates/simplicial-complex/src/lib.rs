//! Simplicial complexes for higher-order message passing.
//!
//! Signals live on nodes, edges, triangles (and higher simplices), and flow both
//! "up" to the simplices that contain a simplex and "down" to the simplices it
//! contains. This crate holds the data model that makes that tractable:
//!
//! 1. **Chains**: one per order; features, labels, upper/lower adjacency, and
//!    the node set of every simplex
//! 2. **Complexes**: chains for orders `0..=max_order` plus the derived
//!    shared-face / shared-coface tables that locate a neighbor's feature at the
//!    adjacent order
//! 3. **Orientation**: typestate access to the combinatorial Hodge Laplacian
//!
//! ## Module Organization
//!
//! - `simplex`: simplex keys, edge lists, keyed reverse/coface maps
//! - `chain`, `complex`: the data model and consolidation
//! - `orientation`, `features`: orientation strategies and feature initialisers
//! - `builder`, `dummy`: building complexes from simplex lists, small fixtures

pub mod builder;
pub mod chain;
pub mod complex;
pub mod dummy;
pub mod error;
pub mod features;
pub mod orientation;
pub mod simplex;

pub use builder::ComplexBuilder;
pub use chain::Chain;
pub use complex::{consolidate, ChainInputs, Complex, Consolidation, MIN_ORDER};
pub use error::{ComplexError, Result};
pub use features::{ConstantFeatures, FeatureInitializer};
pub use orientation::{CanonicalOrientation, ExplicitOrientation, OrientedChain, Orientation};
pub use simplex::{AdjacencyIndex, SimplexIndex, SimplexKey, UpperAdjacency};
