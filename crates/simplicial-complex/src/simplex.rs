//! Simplex identity and the keyed indices built on top of it.
//!
//! A simplex is identified by the set of order-0 nodes it spans. We store that
//! set as a sorted, duplicate-free `SimplexKey`, so two simplices are the same
//! exactly when their keys compare equal. Every cross-order lookup (reverse
//! mappings, shared faces, shared cofaces) goes through these keys.
//!
//! Complexity:
//! - building a `SimplexIndex` from a chain mapping is O(n) in the number of
//!   simplices (plus key hashing),
//! - `SimplexIndex::get` and `UpperAdjacency::coface` are O(1) amortized.

use crate::error::{ComplexError, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Simplex Keys
// ============================================================================

/// Sorted node tuple identifying a simplex. A key with `k + 1` nodes is a
/// `k`-simplex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimplexKey(Vec<u32>);

impl SimplexKey {
    /// Build a key from nodes in any order. Repeated nodes are rejected.
    pub fn new(nodes: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut nodes: Vec<u32> = nodes.into_iter().collect();
        nodes.sort_unstable();
        if nodes.windows(2).any(|w| w[0] == w[1]) {
            return Err(ComplexError::InvalidSimplex {
                nodes,
                message: "repeated node".to_string(),
            });
        }
        Ok(Self(nodes))
    }

    pub fn nodes(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Simplex order (`len - 1`); `None` for the empty key.
    pub fn order(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn contains(&self, node: u32) -> bool {
        self.0.binary_search(&node).is_ok()
    }

    /// Nodes present in both keys.
    pub fn intersection(&self, other: &SimplexKey) -> SimplexKey {
        let (mut i, mut j) = (0, 0);
        let mut out = Vec::with_capacity(self.0.len().min(other.0.len()));
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        SimplexKey(out)
    }

    /// Nodes present in either key.
    pub fn union(&self, other: &SimplexKey) -> SimplexKey {
        let mut out: Vec<u32> = self.0.iter().chain(other.0.iter()).copied().collect();
        out.sort_unstable();
        out.dedup();
        SimplexKey(out)
    }

    /// Position (in this key) of the first node that `sub` does not contain.
    ///
    /// For a codimension-one face this is the index `i` in the boundary sum
    /// `∑ (-1)^i [v_0, .., v̂_i, .., v_k]`.
    pub fn missing_position(&self, sub: &SimplexKey) -> Option<usize> {
        self.0.iter().position(|n| !sub.contains(*n))
    }

    /// Codimension-one faces, paired with the index of the dropped node.
    pub fn faces(&self) -> impl Iterator<Item = (usize, SimplexKey)> + '_ {
        (0..self.0.len()).map(move |i| {
            let mut nodes = self.0.clone();
            nodes.remove(i);
            (i, SimplexKey(nodes))
        })
    }
}

impl fmt::Display for SimplexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{n}")?;
        }
        write!(f, ")")
    }
}

impl TryFrom<Vec<u32>> for SimplexKey {
    type Error = ComplexError;

    fn try_from(value: Vec<u32>) -> Result<Self> {
        Self::new(value)
    }
}

// ============================================================================
// Adjacency Index (edge list)
// ============================================================================

/// Directed edge list between simplices of one order, stored as two parallel
/// sequences. Undirected adjacency carries both directions explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyIndex {
    src: Vec<usize>,
    dst: Vec<usize>,
}

impl AdjacencyIndex {
    pub fn new(src: Vec<usize>, dst: Vec<usize>) -> Result<Self> {
        if src.len() != dst.len() {
            return Err(ComplexError::MismatchedIndex {
                src: src.len(),
                dst: dst.len(),
            });
        }
        Ok(Self { src, dst })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let (src, dst) = pairs.into_iter().unzip();
        Self { src, dst }
    }

    pub fn src(&self) -> &[usize] {
        &self.src
    }

    pub fn dst(&self) -> &[usize] {
        &self.dst
    }

    /// Number of directed edges.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Largest simplex id referenced by any edge.
    pub fn max_endpoint(&self) -> Option<usize> {
        self.src.iter().chain(self.dst.iter()).copied().max()
    }
}

// ============================================================================
// Reverse Mapping (key -> id)
// ============================================================================

/// Reverse lookup from a simplex key to its row id within one chain.
#[derive(Debug, Clone, Default)]
pub struct SimplexIndex {
    ids: AHashMap<SimplexKey, usize>,
}

impl SimplexIndex {
    /// Build the index for the `order`-chain whose row `i` is `mapping[i]`.
    pub fn from_mapping(order: usize, mapping: &[SimplexKey]) -> Result<Self> {
        let mut ids = AHashMap::with_capacity(mapping.len());
        for (id, key) in mapping.iter().enumerate() {
            if let Some(prev) = ids.insert(key.clone(), id) {
                return Err(ComplexError::chain(
                    order,
                    format!("simplex {key} appears at both id {prev} and id {id}"),
                ));
            }
        }
        Ok(Self { ids })
    }

    pub fn get(&self, key: &SimplexKey) -> Option<usize> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ============================================================================
// Upper Adjacency Map
// ============================================================================

/// `key(a) -> key(b) -> key(common coface)` for upper-adjacent simplices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpperAdjacency {
    adjs: AHashMap<SimplexKey, AHashMap<SimplexKey, SimplexKey>>,
}

impl UpperAdjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a` and `b` are both faces of `coface`. Only the `a -> b`
    /// direction is recorded; callers insert the reverse pair themselves.
    pub fn insert(&mut self, a: SimplexKey, b: SimplexKey, coface: SimplexKey) {
        self.adjs.entry(a).or_default().insert(b, coface);
    }

    pub fn coface(&self, a: &SimplexKey, b: &SimplexKey) -> Option<&SimplexKey> {
        self.adjs.get(a)?.get(b)
    }

    /// Cofaces recorded for `a`, with repetition (one per upper neighbor).
    pub fn cofaces_of<'a>(&'a self, a: &SimplexKey) -> impl Iterator<Item = &'a SimplexKey> + 'a {
        self.adjs.get(a).into_iter().flat_map(|m| m.values())
    }

    /// Number of recorded `(a, b)` pairs.
    pub fn len(&self) -> usize {
        self.adjs.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjs.values().all(|m| m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(nodes: &[u32]) -> SimplexKey {
        SimplexKey::new(nodes.iter().copied()).unwrap()
    }

    #[test]
    fn test_key_is_sorted_and_rejects_repeats() {
        assert_eq!(key(&[4, 1, 2]).nodes(), &[1, 2, 4]);
        assert_eq!(key(&[4, 1, 2]).order(), Some(2));
        assert!(SimplexKey::new([3, 1, 3]).is_err());
    }

    #[test]
    fn test_intersection_and_union() {
        let a = key(&[0, 1, 2]);
        let b = key(&[1, 2, 3]);
        assert_eq!(a.intersection(&b), key(&[1, 2]));
        assert_eq!(a.union(&b), key(&[0, 1, 2, 3]));
        assert!(key(&[0]).intersection(&key(&[1])).is_empty());
    }

    #[test]
    fn test_faces_carry_dropped_position() {
        let faces: Vec<_> = key(&[0, 1, 2]).faces().collect();
        assert_eq!(faces[0], (0, key(&[1, 2])));
        assert_eq!(faces[1], (1, key(&[0, 2])));
        assert_eq!(faces[2], (2, key(&[0, 1])));
        assert_eq!(key(&[0, 1, 2]).missing_position(&key(&[0, 2])), Some(1));
    }

    #[test]
    fn test_adjacency_index_rejects_mismatched_lengths() {
        let err = AdjacencyIndex::new(vec![0, 1], vec![1]).unwrap_err();
        assert_eq!(err, ComplexError::MismatchedIndex { src: 2, dst: 1 });

        let idx = AdjacencyIndex::from_pairs([(0, 1), (1, 0), (1, 5)]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.max_endpoint(), Some(5));
        assert_eq!(idx.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 0), (1, 5)]);
    }

    #[test]
    fn test_simplex_index_rejects_duplicate_keys() {
        let mapping = vec![key(&[0, 1]), key(&[1, 2]), key(&[1, 0])];
        let err = SimplexIndex::from_mapping(1, &mapping).unwrap_err();
        assert!(matches!(err, ComplexError::InvalidChain { order: 1, .. }));
    }

    #[test]
    fn test_upper_adjacency_lookup() {
        let mut adjs = UpperAdjacency::new();
        adjs.insert(key(&[0, 1]), key(&[1, 2]), key(&[0, 1, 2]));
        adjs.insert(key(&[1, 2]), key(&[0, 1]), key(&[0, 1, 2]));
        assert_eq!(
            adjs.coface(&key(&[0, 1]), &key(&[1, 2])),
            Some(&key(&[0, 1, 2]))
        );
        assert_eq!(adjs.coface(&key(&[0, 1]), &key(&[0, 2])), None);
        assert_eq!(adjs.len(), 2);
        assert_eq!(adjs.cofaces_of(&key(&[0, 1])).count(), 1);
    }
}
