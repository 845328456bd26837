//! A chain: every simplex of one order, with features, labels and adjacency.

use crate::error::{ComplexError, Result};
use crate::features::FeatureInitializer;
use crate::simplex::{AdjacencyIndex, SimplexIndex, SimplexKey, UpperAdjacency};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// All `order`-simplices of a complex.
///
/// Row `i` of `x` and entry `i` of `y` describe simplex `i`, whose node set is
/// `mapping[i]`. Chains are assembled with the `with_*` builders and are
/// read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    order: usize,
    mapping: Vec<SimplexKey>,
    x: Option<Array2<f32>>,
    upper_index: Option<AdjacencyIndex>,
    upper_adjs: Option<UpperAdjacency>,
    lower_index: Option<AdjacencyIndex>,
    y: Option<Array1<i64>>,
}

impl Chain {
    /// Start an `order`-chain whose simplex `i` spans `mapping[i]`.
    pub fn new(order: usize, mapping: Vec<SimplexKey>) -> Result<Self> {
        let chain = Self {
            order,
            mapping,
            x: None,
            upper_index: None,
            upper_adjs: None,
            lower_index: None,
            y: None,
        };
        chain.check_mapping()?;
        Ok(chain)
    }

    /// Like [`Chain::new`], from raw node lists.
    pub fn from_nodes(order: usize, mapping: Vec<Vec<u32>>) -> Result<Self> {
        let keys = mapping
            .into_iter()
            .map(SimplexKey::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(order, keys)
    }

    pub fn with_features(mut self, x: Array2<f32>) -> Result<Self> {
        if x.nrows() != self.num_simplices() {
            return Err(ComplexError::chain(
                self.order,
                format!(
                    "feature matrix has {} rows for {} simplices",
                    x.nrows(),
                    self.num_simplices()
                ),
            ));
        }
        self.x = Some(x);
        Ok(self)
    }

    pub fn with_initialized_features<I: FeatureInitializer + ?Sized>(
        self,
        init: &I,
    ) -> Result<Self> {
        let x = init.initialize(self.order, self.num_simplices());
        self.with_features(x)
    }

    /// Attach the upper adjacency and the coface map it was derived from.
    pub fn with_upper(mut self, index: AdjacencyIndex, upper_adjs: UpperAdjacency) -> Result<Self> {
        self.check_index("upper", &index)?;
        self.upper_index = Some(index);
        self.upper_adjs = Some(upper_adjs);
        Ok(self)
    }

    pub fn with_lower(mut self, index: AdjacencyIndex) -> Result<Self> {
        self.check_index("lower", &index)?;
        self.lower_index = Some(index);
        Ok(self)
    }

    pub fn with_labels(mut self, y: Array1<i64>) -> Result<Self> {
        if y.len() != self.num_simplices() {
            return Err(ComplexError::chain(
                self.order,
                format!(
                    "label vector has {} entries for {} simplices",
                    y.len(),
                    self.num_simplices()
                ),
            ));
        }
        self.y = Some(y);
        Ok(self)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn num_simplices(&self) -> usize {
        self.mapping.len()
    }

    pub fn mapping(&self) -> &[SimplexKey] {
        &self.mapping
    }

    /// Node key of simplex `id`.
    pub fn key(&self, id: usize) -> Option<&SimplexKey> {
        self.mapping.get(id)
    }

    pub fn x(&self) -> Option<&Array2<f32>> {
        self.x.as_ref()
    }

    pub fn upper_index(&self) -> Option<&AdjacencyIndex> {
        self.upper_index.as_ref()
    }

    pub fn upper_adjs(&self) -> Option<&UpperAdjacency> {
        self.upper_adjs.as_ref()
    }

    pub fn lower_index(&self) -> Option<&AdjacencyIndex> {
        self.lower_index.as_ref()
    }

    pub fn y(&self) -> Option<&Array1<i64>> {
        self.y.as_ref()
    }

    /// Reverse mapping for this chain.
    pub fn index(&self) -> Result<SimplexIndex> {
        SimplexIndex::from_mapping(self.order, &self.mapping)
    }

    /// Re-check every shape invariant. Chains that arrive through serde skip
    /// the builders, so complexes call this before consolidating.
    pub fn validate(&self) -> Result<()> {
        self.check_mapping()?;
        if let Some(x) = &self.x {
            if x.nrows() != self.num_simplices() {
                return Err(ComplexError::chain(
                    self.order,
                    format!(
                        "feature matrix has {} rows for {} simplices",
                        x.nrows(),
                        self.num_simplices()
                    ),
                ));
            }
        }
        if let Some(y) = &self.y {
            if y.len() != self.num_simplices() {
                return Err(ComplexError::chain(
                    self.order,
                    format!(
                        "label vector has {} entries for {} simplices",
                        y.len(),
                        self.num_simplices()
                    ),
                ));
            }
        }
        if let Some(index) = &self.upper_index {
            self.check_index("upper", index)?;
            if self.upper_adjs.is_none() {
                return Err(ComplexError::chain(
                    self.order,
                    "upper index without an upper adjacency map",
                ));
            }
        }
        if let Some(index) = &self.lower_index {
            self.check_index("lower", index)?;
        }
        Ok(())
    }

    fn check_mapping(&self) -> Result<()> {
        for (id, key) in self.mapping.iter().enumerate() {
            if key.len() != self.order + 1 {
                return Err(ComplexError::chain(
                    self.order,
                    format!(
                        "simplex {id} spans {} nodes {key}, expected {}",
                        key.len(),
                        self.order + 1
                    ),
                ));
            }
        }
        Ok(())
    }

    fn check_index(&self, kind: &str, index: &AdjacencyIndex) -> Result<()> {
        if index.src().len() != index.dst().len() {
            return Err(ComplexError::MismatchedIndex {
                src: index.src().len(),
                dst: index.dst().len(),
            });
        }
        if let Some(max) = index.max_endpoint() {
            if max >= self.num_simplices() {
                return Err(ComplexError::chain(
                    self.order,
                    format!(
                        "{kind} index references simplex {max} but the chain has {}",
                        self.num_simplices()
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ConstantFeatures;
    use ndarray::array;

    fn edges() -> Chain {
        Chain::from_nodes(1, vec![vec![0, 1], vec![1, 2], vec![0, 2]]).unwrap()
    }

    #[test]
    fn test_mapping_arity_is_checked() {
        let err = Chain::from_nodes(1, vec![vec![0, 1], vec![2]]).unwrap_err();
        assert!(matches!(err, ComplexError::InvalidChain { order: 1, .. }));
    }

    #[test]
    fn test_mapping_is_canonicalized() {
        let chain = Chain::from_nodes(1, vec![vec![1, 0]]).unwrap();
        assert_eq!(chain.key(0).unwrap().nodes(), &[0, 1]);
    }

    #[test]
    fn test_feature_rows_must_match() {
        let err = edges().with_features(array![[1.0f32], [2.0]]).unwrap_err();
        assert!(matches!(err, ComplexError::InvalidChain { .. }));
        let chain = edges().with_features(array![[1.0f32], [2.0], [3.0]]).unwrap();
        assert_eq!(chain.x().unwrap().nrows(), 3);
    }

    #[test]
    fn test_index_endpoints_are_bounded() {
        let err = edges()
            .with_lower(AdjacencyIndex::from_pairs([(0, 3)]))
            .unwrap_err();
        assert!(matches!(err, ComplexError::InvalidChain { .. }));
    }

    #[test]
    fn test_labels_length_must_match() {
        assert!(edges().with_labels(array![0, 1]).is_err());
        let chain = edges().with_labels(array![0, 1, 1]).unwrap();
        assert_eq!(chain.y().unwrap()[2], 1);
    }

    #[test]
    fn test_initialized_features() {
        let chain = edges()
            .with_initialized_features(&ConstantFeatures::new(0.5, 2))
            .unwrap();
        assert_eq!(chain.x().unwrap(), &array![[0.5f32, 0.5], [0.5, 0.5], [0.5, 0.5]]);
    }
}
