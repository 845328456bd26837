//! Orientation and the combinatorial Hodge Laplacian.
//!
//! A chain has no sign information until it is oriented, so the Laplacian is
//! only reachable through [`OrientedChain`]: `chain.orient(&strategy)?` is the
//! typestate transition, and `hodge_laplacian()` does not exist on a bare
//! [`Chain`].
//!
//! Conventions (standard combinatorial definition):
//!
//! - the canonical orientation of a simplex lists its nodes in ascending
//!   order; an [`Orientation`] assigns each simplex a sign `o(s) = ±1`
//!   relative to that,
//! - the boundary coefficient of face `f = s \ {v_i}` in `s` is
//!   `σ(f, s) = (-1)^i · o(s) · o(f)`,
//! - `L_k = B_kᵀ B_k + B_{k+1} B_{k+1}ᵀ`.
//!
//! Off-diagonal entries only ever multiply two coefficients that share the
//! same face (lower) or coface (upper), so `o(f)` squares away and the
//! Laplacian of the `k`-chain depends on the `k`-chain alone.

use crate::chain::Chain;
use crate::error::{ComplexError, Result};
use crate::simplex::SimplexKey;
use ahash::AHashSet;
use ndarray::Array2;
use std::sync::OnceLock;

/// Per-simplex sign relative to the ascending-node orientation.
pub trait Orientation {
    fn sign(&self, id: usize, key: &SimplexKey) -> f32;

    /// Reject a strategy that cannot orient `chain`.
    fn check(&self, chain: &Chain) -> Result<()> {
        let _ = chain;
        Ok(())
    }
}

/// Ascending node order for every simplex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalOrientation;

impl Orientation for CanonicalOrientation {
    fn sign(&self, _id: usize, _key: &SimplexKey) -> f32 {
        1.0
    }
}

/// Caller-chosen signs, one per simplex id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitOrientation(Vec<f32>);

impl ExplicitOrientation {
    pub fn new(signs: Vec<f32>) -> Result<Self> {
        if let Some(pos) = signs.iter().position(|s| *s != 1.0 && *s != -1.0) {
            return Err(ComplexError::InvalidOrientation(format!(
                "sign {} at simplex {pos} is not ±1",
                signs[pos]
            )));
        }
        Ok(Self(signs))
    }
}

impl Orientation for ExplicitOrientation {
    fn sign(&self, id: usize, _key: &SimplexKey) -> f32 {
        self.0[id]
    }

    fn check(&self, chain: &Chain) -> Result<()> {
        if self.0.len() != chain.num_simplices() {
            return Err(ComplexError::InvalidOrientation(format!(
                "{} signs for a {}-chain of {} simplices",
                self.0.len(),
                chain.order(),
                chain.num_simplices()
            )));
        }
        Ok(())
    }
}

/// A chain together with the orientation products along its adjacency edges.
#[derive(Debug)]
pub struct OrientedChain<'a> {
    chain: &'a Chain,
    lower_orientation: Vec<f32>,
    upper_orientation: Vec<f32>,
    num_cofaces: Vec<usize>,
    hodge_laplacian: OnceLock<Array2<f32>>,
}

impl Chain {
    /// Orient this chain. `CanonicalOrientation` gives the usual ascending
    /// convention.
    pub fn orient<O: Orientation + ?Sized>(&self, orientation: &O) -> Result<OrientedChain<'_>> {
        orientation.check(self)?;
        let order = self.order();
        let signs: Vec<f32> = self
            .mapping()
            .iter()
            .enumerate()
            .map(|(id, key)| orientation.sign(id, key))
            .collect();

        let mut lower_orientation = Vec::new();
        if let Some(lower) = self.lower_index() {
            lower_orientation.reserve(lower.len());
            for (edge, (a, b)) in lower.iter().enumerate() {
                let (ka, kb) = (&self.mapping()[a], &self.mapping()[b]);
                let face = ka.intersection(kb);
                if face.len() != order {
                    return Err(ComplexError::chain(
                        order,
                        format!("lower edge {edge} joins {ka} and {kb}, which share no face"),
                    ));
                }
                let sa = incidence(ka, &face) * signs[a];
                let sb = incidence(kb, &face) * signs[b];
                lower_orientation.push(sa * sb);
            }
        }

        let mut upper_orientation = Vec::new();
        if let Some(upper) = self.upper_index() {
            upper_orientation.reserve(upper.len());
            for (edge, (a, b)) in upper.iter().enumerate() {
                let (ka, kb) = (&self.mapping()[a], &self.mapping()[b]);
                let coface = ka.union(kb);
                if coface.len() != order + 2 {
                    return Err(ComplexError::chain(
                        order,
                        format!("upper edge {edge} joins {ka} and {kb}, which span no coface"),
                    ));
                }
                let sa = incidence(&coface, ka) * signs[a];
                let sb = incidence(&coface, kb) * signs[b];
                upper_orientation.push(sa * sb);
            }
        }

        let num_cofaces = match self.upper_adjs() {
            Some(adjs) => self
                .mapping()
                .iter()
                .map(|key| adjs.cofaces_of(key).collect::<AHashSet<_>>().len())
                .collect(),
            None => vec![0; self.num_simplices()],
        };

        Ok(OrientedChain {
            chain: self,
            lower_orientation,
            upper_orientation,
            num_cofaces,
            hodge_laplacian: OnceLock::new(),
        })
    }
}

/// `(-1)^i` where `i` is the position in `outer` of the node missing from `inner`.
fn incidence(outer: &SimplexKey, inner: &SimplexKey) -> f32 {
    match outer.missing_position(inner) {
        Some(i) if i % 2 == 1 => -1.0,
        _ => 1.0,
    }
}

impl<'a> OrientedChain<'a> {
    pub fn chain(&self) -> &'a Chain {
        self.chain
    }

    /// `±1` per lower-adjacency edge, aligned with `lower_index`.
    pub fn lower_orientation(&self) -> &[f32] {
        &self.lower_orientation
    }

    /// `±1` per upper-adjacency edge, aligned with `upper_index`.
    pub fn upper_orientation(&self) -> &[f32] {
        &self.upper_orientation
    }

    /// Dense `L_k`, computed on first access and cached.
    pub fn hodge_laplacian(&self) -> &Array2<f32> {
        self.hodge_laplacian.get_or_init(|| self.compute_laplacian())
    }

    fn compute_laplacian(&self) -> Array2<f32> {
        let n = self.chain.num_simplices();
        let order = self.chain.order();
        let num_faces = if order == 0 { 0 } else { order + 1 };

        let mut laplacian = Array2::<f32>::zeros((n, n));
        for (i, cofaces) in self.num_cofaces.iter().enumerate() {
            laplacian[[i, i]] = (num_faces + cofaces) as f32;
        }
        if let Some(lower) = self.chain.lower_index() {
            for ((a, b), sign) in lower.iter().zip(&self.lower_orientation) {
                laplacian[[a, b]] += sign;
            }
        }
        if let Some(upper) = self.chain.upper_index() {
            for ((a, b), sign) in upper.iter().zip(&self.upper_orientation) {
                laplacian[[a, b]] += sign;
            }
        }

        tracing::debug!(order, simplices = n, "computed hodge laplacian");
        laplacian
    }
}
