//! Simplicial complexes: one chain per order plus the cross-order tables that
//! align neighbor features with adjacency edges.
//!
//! ## Consolidation
//!
//! At construction every complex derives, once:
//!
//! - `shared_faces[k]`: for lower-adjacency edge `e = (a, b)` of the `k`-chain,
//!   the `(k-1)`-id of the face `a ∩ b`,
//! - `shared_cofaces[k]`: for upper-adjacency edge `e = (a, b)` of the
//!   `k`-chain, the `(k+1)`-id of the coface recorded in `upper_adjs`.
//!
//! Entry `e` of each table belongs to edge `e` of the matching index; feature
//! gathers in [`Complex::get_inputs`] rely on that alignment. A relation the
//! mappings cannot back is reported as
//! [`ComplexError::MalformedConsolidation`] instead of being skipped.

use crate::chain::Chain;
use crate::error::{ComplexError, Result};
use crate::simplex::{AdjacencyIndex, SimplexIndex, SimplexKey};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Lowest order present in every complex.
pub const MIN_ORDER: usize = 0;

/// Derived face/coface tables, indexed by order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    shared_faces: Vec<Vec<usize>>,
    shared_cofaces: Vec<Vec<usize>>,
}

impl Consolidation {
    pub fn shared_faces(&self, order: usize) -> &[usize] {
        self.shared_faces
            .get(order)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn shared_cofaces(&self, order: usize) -> &[usize] {
        self.shared_cofaces
            .get(order)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Derive the shared face/coface tables for `chains` (chain `k` has order `k`).
///
/// This is a pure function of the chains: running it twice yields identical
/// tables.
pub fn consolidate(chains: &[Chain]) -> Result<Consolidation> {
    let rev_mappings = chains
        .iter()
        .map(Chain::index)
        .collect::<Result<Vec<SimplexIndex>>>()?;

    let mut shared_faces = vec![Vec::new(); chains.len()];
    let mut shared_cofaces = vec![Vec::new(); chains.len()];

    for order in MIN_ORDER..chains.len().saturating_sub(1) {
        let upper_chain = &chains[order + 1];
        if let Some(lower) = upper_chain.lower_index() {
            shared_faces[order + 1] =
                resolve_shared_faces(upper_chain, lower, &rev_mappings[order])?;
        }

        let chain = &chains[order];
        if let Some(upper) = chain.upper_index() {
            shared_cofaces[order] = resolve_shared_cofaces(chain, upper, &rev_mappings[order + 1])?;
        }
    }

    Ok(Consolidation {
        shared_faces,
        shared_cofaces,
    })
}

fn resolve_shared_faces(
    chain: &Chain,
    lower: &AdjacencyIndex,
    faces: &SimplexIndex,
) -> Result<Vec<usize>> {
    let order = chain.order();
    let mut shared = Vec::with_capacity(lower.len());
    for (edge, (a, b)) in lower.iter().enumerate() {
        let (key_a, key_b) = endpoint_keys(chain, edge, a, b)?;
        let face = key_a.intersection(key_b);
        let id = faces.get(&face).ok_or_else(|| {
            ComplexError::malformed(
                order,
                edge,
                format!("simplices {key_a} and {key_b} share {face}, which is not a face in the complex"),
            )
        })?;
        shared.push(id);
    }
    Ok(shared)
}

fn resolve_shared_cofaces(
    chain: &Chain,
    upper: &AdjacencyIndex,
    cofaces: &SimplexIndex,
) -> Result<Vec<usize>> {
    let order = chain.order();
    let adjs = chain.upper_adjs().ok_or_else(|| {
        ComplexError::malformed(order, 0, "upper index without an upper adjacency map")
    })?;
    let mut shared = Vec::with_capacity(upper.len());
    for (edge, (a, b)) in upper.iter().enumerate() {
        let (key_a, key_b) = endpoint_keys(chain, edge, a, b)?;
        let coface = adjs.coface(key_a, key_b).ok_or_else(|| {
            ComplexError::malformed(
                order,
                edge,
                format!("no common coface recorded for {key_a} and {key_b}"),
            )
        })?;
        let id = cofaces.get(coface).ok_or_else(|| {
            ComplexError::malformed(
                order,
                edge,
                format!("coface {coface} of {key_a} and {key_b} is not in the complex"),
            )
        })?;
        shared.push(id);
    }
    Ok(shared)
}

fn endpoint_keys(
    chain: &Chain,
    edge: usize,
    a: usize,
    b: usize,
) -> Result<(&SimplexKey, &SimplexKey)> {
    match (chain.key(a), chain.key(b)) {
        (Some(ka), Some(kb)) => Ok((ka, kb)),
        _ => Err(ComplexError::malformed(
            chain.order(),
            edge,
            format!("edge ({a}, {b}) references a missing simplex"),
        )),
    }
}

// ============================================================================
// Complex
// ============================================================================

/// Everything a message-passing layer needs at one order.
#[derive(Debug, Clone)]
pub struct ChainInputs<'a> {
    pub order: usize,
    pub x: Option<&'a Array2<f32>>,
    pub upper_index: Option<&'a AdjacencyIndex>,
    /// Row `e` is the feature of the coface shared by upper edge `e`.
    pub upper_features: Option<Array2<f32>>,
    pub lower_index: Option<&'a AdjacencyIndex>,
    /// Row `e` is the feature of the face shared by lower edge `e`.
    pub lower_features: Option<Array2<f32>>,
}

/// An attributed simplicial complex with chains for orders `0..=max_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ComplexParts", into = "ComplexParts")]
pub struct Complex {
    chains: Vec<Chain>,
    y: Option<Array1<i64>>,
    consolidation: Consolidation,
}

/// Serialized form: the chains and label only. Tables are re-derived on load.
#[derive(Serialize, Deserialize)]
struct ComplexParts {
    chains: Vec<Chain>,
    y: Option<Array1<i64>>,
}

impl TryFrom<ComplexParts> for Complex {
    type Error = ComplexError;

    fn try_from(parts: ComplexParts) -> Result<Self> {
        Complex::new(parts.chains, parts.y)
    }
}

impl From<Complex> for ComplexParts {
    fn from(complex: Complex) -> Self {
        Self {
            chains: complex.chains,
            y: complex.y,
        }
    }
}

impl Complex {
    /// Build a complex from chains of orders `0, 1, .., n` (in that order).
    pub fn new(chains: Vec<Chain>, y: Option<Array1<i64>>) -> Result<Self> {
        if chains.is_empty() {
            return Err(ComplexError::InvalidComplex(
                "a complex needs at least one chain".to_string(),
            ));
        }
        for (position, chain) in chains.iter().enumerate() {
            if chain.order() != MIN_ORDER + position {
                return Err(ComplexError::InvalidComplex(format!(
                    "chain at position {position} has order {}",
                    chain.order()
                )));
            }
            chain.validate()?;
        }

        let consolidation = consolidate(&chains)?;
        tracing::debug!(
            max_order = chains.len() - 1,
            simplices = ?chains.iter().map(Chain::num_simplices).collect::<Vec<_>>(),
            "consolidated complex"
        );

        Ok(Self {
            chains,
            y,
            consolidation,
        })
    }

    /// Nodes, edges and triangles.
    pub fn from_parts(
        nodes: Chain,
        edges: Chain,
        triangles: Chain,
        y: Option<Array1<i64>>,
    ) -> Result<Self> {
        Self::new(vec![nodes, edges, triangles], y)
    }

    pub fn min_order(&self) -> usize {
        MIN_ORDER
    }

    pub fn max_order(&self) -> usize {
        MIN_ORDER + self.chains.len() - 1
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, order: usize) -> Result<&Chain> {
        order
            .checked_sub(MIN_ORDER)
            .and_then(|i| self.chains.get(i))
            .ok_or(ComplexError::UnsupportedOrder {
                order,
                min_order: self.min_order(),
                max_order: self.max_order(),
            })
    }

    pub fn num_simplices(&self, order: usize) -> Result<usize> {
        Ok(self.chain(order)?.num_simplices())
    }

    /// Complex-wide label.
    pub fn y(&self) -> Option<&Array1<i64>> {
        self.y.as_ref()
    }

    pub fn consolidation(&self) -> &Consolidation {
        &self.consolidation
    }

    pub fn shared_faces(&self, order: usize) -> &[usize] {
        self.consolidation.shared_faces(order)
    }

    pub fn shared_cofaces(&self, order: usize) -> &[usize] {
        self.consolidation.shared_cofaces(order)
    }

    /// Features and adjacency for message passing at `order`.
    ///
    /// Upper/lower neighbor features are the rows of the adjacent chain picked
    /// by the shared coface/face tables, one row per adjacency edge. They are
    /// `None` at the top/bottom order, when the adjacency is absent, or when
    /// the adjacent chain has no features.
    pub fn get_inputs(&self, order: usize) -> Result<ChainInputs<'_>> {
        let chain = self.chain(order)?;

        let (upper_index, upper_features) = if order < self.max_order() {
            let index = chain.upper_index();
            let features = index.and(self.chains[order + 1 - MIN_ORDER].x()).map(|x| {
                x.select(Axis(0), self.consolidation.shared_cofaces(order))
            });
            (index, features)
        } else {
            (None, None)
        };

        let (lower_index, lower_features) = if order > self.min_order() {
            let index = chain.lower_index();
            let features = index.and(self.chains[order - 1 - MIN_ORDER].x()).map(|x| {
                x.select(Axis(0), self.consolidation.shared_faces(order))
            });
            (index, features)
        } else {
            (None, None)
        };

        Ok(ChainInputs {
            order,
            x: chain.x(),
            upper_index,
            upper_features,
            lower_index,
            lower_features,
        })
    }

    /// Complex-wide label for `None`, per-simplex labels for `Some(order)`.
    pub fn get_labels(&self, order: Option<usize>) -> Result<Option<&Array1<i64>>> {
        match order {
            None => Ok(self.y.as_ref()),
            Some(order) => Ok(self.chain(order)?.y()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplex::UpperAdjacency;
    use ndarray::array;

    fn key(nodes: &[u32]) -> SimplexKey {
        SimplexKey::new(nodes.iter().copied()).unwrap()
    }

    /// Two vertices joined by one edge; no triangles.
    fn segment() -> Complex {
        let mut adjs = UpperAdjacency::new();
        adjs.insert(key(&[0]), key(&[1]), key(&[0, 1]));
        adjs.insert(key(&[1]), key(&[0]), key(&[0, 1]));
        let nodes = Chain::from_nodes(0, vec![vec![0], vec![1]])
            .unwrap()
            .with_features(array![[1.0f32], [2.0]])
            .unwrap()
            .with_upper(AdjacencyIndex::from_pairs([(0, 1), (1, 0)]), adjs)
            .unwrap();
        let edges = Chain::from_nodes(1, vec![vec![0, 1]])
            .unwrap()
            .with_features(array![[10.0f32]])
            .unwrap()
            .with_lower(AdjacencyIndex::default())
            .unwrap();
        let triangles = Chain::new(2, Vec::new()).unwrap();
        Complex::from_parts(nodes, edges, triangles, Some(array![1])).unwrap()
    }

    #[test]
    fn test_chain_orders_must_be_contiguous() {
        let nodes = Chain::from_nodes(0, vec![vec![0]]).unwrap();
        let triangles = Chain::new(2, Vec::new()).unwrap();
        let err = Complex::new(vec![nodes, triangles], None).unwrap_err();
        assert!(matches!(err, ComplexError::InvalidComplex(_)));
        assert!(Complex::new(Vec::new(), None).is_err());
    }

    #[test]
    fn test_upper_features_follow_shared_cofaces() {
        let complex = segment();
        assert_eq!(complex.shared_cofaces(0), &[0, 0]);
        let inputs = complex.get_inputs(0).unwrap();
        assert_eq!(inputs.upper_features.unwrap(), array![[10.0f32], [10.0]]);
        assert!(inputs.lower_index.is_none());
        assert!(inputs.lower_features.is_none());
    }

    #[test]
    fn test_top_order_has_no_upper_inputs() {
        let complex = segment();
        let inputs = complex.get_inputs(2).unwrap();
        assert!(inputs.upper_index.is_none());
        assert!(inputs.upper_features.is_none());
    }

    #[test]
    fn test_unsupported_order() {
        let complex = segment();
        let err = complex.get_inputs(3).unwrap_err();
        assert_eq!(
            err,
            ComplexError::UnsupportedOrder {
                order: 3,
                min_order: 0,
                max_order: 2
            }
        );
        assert!(complex.get_labels(Some(7)).is_err());
    }

    #[test]
    fn test_labels() {
        let complex = segment();
        assert_eq!(complex.get_labels(None).unwrap(), Some(&array![1]));
        assert_eq!(complex.get_labels(Some(0)).unwrap(), None);
    }

    #[test]
    fn test_missing_coface_fails_loudly() {
        let mut adjs = UpperAdjacency::new();
        adjs.insert(key(&[0]), key(&[1]), key(&[0, 1]));
        let nodes = Chain::from_nodes(0, vec![vec![0], vec![1]])
            .unwrap()
            .with_upper(AdjacencyIndex::from_pairs([(0, 1), (1, 0)]), adjs)
            .unwrap();
        let edges = Chain::from_nodes(1, vec![vec![0, 1]]).unwrap();
        let err = Complex::new(vec![nodes, edges], None).unwrap_err();
        assert!(matches!(
            err,
            ComplexError::MalformedConsolidation {
                order: 0,
                edge: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_face_fails_loudly() {
        // Edges (0, 1) and (2, 3) are declared lower adjacent but share nothing.
        let nodes = Chain::from_nodes(0, (0..4).map(|n| vec![n]).collect()).unwrap();
        let edges = Chain::from_nodes(1, vec![vec![0, 1], vec![2, 3]])
            .unwrap()
            .with_lower(AdjacencyIndex::from_pairs([(0, 1), (1, 0)]))
            .unwrap();
        let err = Complex::new(vec![nodes, edges], None).unwrap_err();
        assert!(matches!(
            err,
            ComplexError::MalformedConsolidation {
                order: 1,
                edge: 0,
                ..
            }
        ));
    }
}
