//! Build a consolidated `Complex` from a list of simplices.
//!
//! Generators and fixtures describe a complex by its simplices only; the
//! builder closes them downward, numbers every order in sorted key order and
//! derives the adjacency indices and coface maps the chains need.

use crate::chain::Chain;
use crate::complex::Complex;
use crate::error::{ComplexError, Result};
use crate::simplex::{AdjacencyIndex, SimplexIndex, SimplexKey, UpperAdjacency};
use ahash::AHashMap;
use ndarray::{Array1, Array2};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ComplexBuilder {
    max_order: usize,
    simplices: Vec<BTreeSet<SimplexKey>>,
    features: Vec<Option<Array2<f32>>>,
    labels: Vec<Option<Array1<i64>>>,
    y: Option<Array1<i64>>,
}

impl ComplexBuilder {
    /// A builder for complexes with chains of orders `0..=max_order`.
    pub fn new(max_order: usize) -> Self {
        Self {
            max_order,
            simplices: vec![BTreeSet::new(); max_order + 1],
            features: vec![None; max_order + 1],
            labels: vec![None; max_order + 1],
            y: None,
        }
    }

    /// Add a simplex and all of its faces.
    pub fn add_simplex(&mut self, nodes: &[u32]) -> Result<&mut Self> {
        let key = SimplexKey::new(nodes.iter().copied())?;
        match key.order() {
            Some(order) if order <= self.max_order => {}
            Some(order) => {
                return Err(ComplexError::InvalidSimplex {
                    nodes: key.nodes().to_vec(),
                    message: format!("order {order} exceeds max order {}", self.max_order),
                })
            }
            None => {
                return Err(ComplexError::InvalidSimplex {
                    nodes: Vec::new(),
                    message: "empty simplex".to_string(),
                })
            }
        }
        self.insert_closed(key);
        Ok(self)
    }

    fn insert_closed(&mut self, key: SimplexKey) {
        let Some(order) = key.order() else {
            return;
        };
        if !self.simplices[order].insert(key.clone()) || order == 0 {
            return;
        }
        for (_, face) in key.faces() {
            self.insert_closed(face);
        }
    }

    /// Number of `order`-simplices added so far (faces included).
    pub fn num_simplices(&self, order: usize) -> usize {
        self.simplices.get(order).map(BTreeSet::len).unwrap_or(0)
    }

    /// Features for `order`, rows in sorted key order.
    pub fn features(&mut self, order: usize, x: Array2<f32>) -> Result<&mut Self> {
        let slot = self.features.get_mut(order).ok_or(ComplexError::UnsupportedOrder {
            order,
            min_order: 0,
            max_order: self.max_order,
        })?;
        *slot = Some(x);
        Ok(self)
    }

    pub fn labels(&mut self, order: usize, y: Array1<i64>) -> Result<&mut Self> {
        let slot = self.labels.get_mut(order).ok_or(ComplexError::UnsupportedOrder {
            order,
            min_order: 0,
            max_order: self.max_order,
        })?;
        *slot = Some(y);
        Ok(self)
    }

    pub fn complex_label(&mut self, y: Array1<i64>) -> &mut Self {
        self.y = Some(y);
        self
    }

    /// Sorted keys of every `order`-simplex; position = simplex id.
    pub fn mapping(&self, order: usize) -> Vec<SimplexKey> {
        self.simplices
            .get(order)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn build(&self) -> Result<Complex> {
        let mappings: Vec<Vec<SimplexKey>> =
            (0..=self.max_order).map(|order| self.mapping(order)).collect();
        let indices = mappings
            .iter()
            .enumerate()
            .map(|(order, mapping)| SimplexIndex::from_mapping(order, mapping))
            .collect::<Result<Vec<_>>>()?;

        let mut chains = Vec::with_capacity(self.max_order + 1);
        for (order, mapping) in mappings.iter().enumerate() {
            let mut chain = Chain::new(order, mapping.clone())?;

            if order < self.max_order {
                let (index, adjs) = upper_adjacency(&mappings[order + 1], &indices[order]);
                chain = chain.with_upper(index, adjs)?;
            }
            if order > 0 {
                chain = chain.with_lower(lower_adjacency(mapping, &indices[order - 1]))?;
            }
            if let Some(x) = &self.features[order] {
                chain = chain.with_features(x.clone())?;
            }
            if let Some(y) = &self.labels[order] {
                chain = chain.with_labels(y.clone())?;
            }
            chains.push(chain);
        }

        Complex::new(chains, self.y.clone())
    }
}

/// Pairs of faces of each coface, both directions, sorted by `(a, b)`.
fn upper_adjacency(cofaces: &[SimplexKey], index: &SimplexIndex) -> (AdjacencyIndex, UpperAdjacency) {
    let mut pairs = Vec::new();
    let mut adjs = UpperAdjacency::new();
    for coface in cofaces {
        let faces: Vec<SimplexKey> = coface.faces().map(|(_, f)| f).collect();
        for a in &faces {
            for b in &faces {
                if a == b {
                    continue;
                }
                if let (Some(ia), Some(ib)) = (index.get(a), index.get(b)) {
                    pairs.push((ia, ib));
                    adjs.insert(a.clone(), b.clone(), coface.clone());
                }
            }
        }
    }
    pairs.sort_unstable();
    (AdjacencyIndex::from_pairs(pairs), adjs)
}

/// Pairs of simplices sharing a face, both directions, sorted by `(a, b)`.
fn lower_adjacency(mapping: &[SimplexKey], face_index: &SimplexIndex) -> AdjacencyIndex {
    let mut by_face: AHashMap<usize, Vec<usize>> = AHashMap::new();
    for (id, key) in mapping.iter().enumerate() {
        for (_, face) in key.faces() {
            if let Some(face_id) = face_index.get(&face) {
                by_face.entry(face_id).or_default().push(id);
            }
        }
    }
    let mut pairs = Vec::new();
    for members in by_face.values() {
        for &a in members {
            for &b in members {
                if a != b {
                    pairs.push((a, b));
                }
            }
        }
    }
    pairs.sort_unstable();
    AdjacencyIndex::from_pairs(pairs)
}
