//! Small hand-made complexes for tests and demos.
//!
//! Every chain carries the scalar feature `id + 1` so propagated sums are easy
//! to check by hand.

use crate::builder::ComplexBuilder;
use crate::complex::Complex;
use crate::error::Result;
use ndarray::Array2;

/// Column vector `[[1], [2], .., [n]]`.
pub fn ramp_features(n: usize) -> Array2<f32> {
    Array2::from_shape_fn((n, 1), |(i, _)| (i + 1) as f32)
}

fn with_ramp_features(mut builder: ComplexBuilder, max_order: usize) -> Result<Complex> {
    for order in 0..=max_order {
        let n = builder.num_simplices(order);
        builder.features(order, ramp_features(n))?;
    }
    builder.build()
}

/// A square `1-2-3-4` with the triangle `0-1-4` as its roof.
///
/// ```text
///        0
///       / \
///      1---4
///      |   |
///      2---3
/// ```
pub fn house_complex() -> Result<Complex> {
    let mut builder = ComplexBuilder::new(2);
    builder
        .add_simplex(&[0, 1, 4])?
        .add_simplex(&[1, 2])?
        .add_simplex(&[2, 3])?
        .add_simplex(&[3, 4])?;
    with_ramp_features(builder, 2)
}

/// The 4-cycle `0-1-2-3` plus the isolated vertex `4`.
pub fn square_dot_complex() -> Result<Complex> {
    let mut builder = ComplexBuilder::new(2);
    builder
        .add_simplex(&[0, 1])?
        .add_simplex(&[1, 2])?
        .add_simplex(&[2, 3])?
        .add_simplex(&[0, 3])?
        .add_simplex(&[4])?;
    with_ramp_features(builder, 2)
}

/// Triangles `0-1-2` and `1-2-3` glued along the edge `1-2`.
pub fn two_triangles_complex() -> Result<Complex> {
    let mut builder = ComplexBuilder::new(2);
    builder.add_simplex(&[0, 1, 2])?.add_simplex(&[1, 2, 3])?;
    with_ramp_features(builder, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_sizes() {
        let house = house_complex().unwrap();
        assert_eq!(house.num_simplices(0).unwrap(), 5);
        assert_eq!(house.num_simplices(1).unwrap(), 6);
        assert_eq!(house.num_simplices(2).unwrap(), 1);

        let square = square_dot_complex().unwrap();
        assert_eq!(square.num_simplices(0).unwrap(), 5);
        assert_eq!(square.num_simplices(1).unwrap(), 4);
        assert_eq!(square.num_simplices(2).unwrap(), 0);

        let two = two_triangles_complex().unwrap();
        assert_eq!(two.num_simplices(1).unwrap(), 5);
        assert_eq!(two.num_simplices(2).unwrap(), 2);
    }
}
