//! Feature initialisation strategies for chains that arrive without features.

use ndarray::Array2;

/// Produces a `[num_simplices, width]` feature matrix for an `order`-chain.
pub trait FeatureInitializer {
    fn initialize(&self, order: usize, num_simplices: usize) -> Array2<f32>;
}

/// Every simplex gets the same `width`-dimensional feature `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantFeatures {
    pub value: f32,
    pub width: usize,
}

impl ConstantFeatures {
    pub fn new(value: f32, width: usize) -> Self {
        Self { value, width }
    }
}

impl Default for ConstantFeatures {
    fn default() -> Self {
        Self::new(1.0, 1)
    }
}

impl FeatureInitializer for ConstantFeatures {
    fn initialize(&self, _order: usize, num_simplices: usize) -> Array2<f32> {
        Array2::from_elem((num_simplices, self.width), self.value)
    }
}
