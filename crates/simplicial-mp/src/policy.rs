//! Message policies: how one directed edge turns a source feature (and the
//! optional edge attribute) into a message.

use ndarray::{Array1, ArrayView1};

/// Per-edge message construction.
pub trait MessagePolicy {
    /// Width of the messages built from `x_width`-wide source features and,
    /// when attributes are supplied, `attr_width`-wide edge attributes.
    fn out_width(&self, x_width: usize, attr_width: Option<usize>) -> usize;

    /// Message sent along one edge from the source simplex with feature `x_j`.
    fn message(&self, x_j: ArrayView1<'_, f32>, attr: Option<ArrayView1<'_, f32>>) -> Array1<f32>;
}

/// The message is the source feature; attributes are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceFeature;

impl MessagePolicy for SourceFeature {
    fn out_width(&self, x_width: usize, _attr_width: Option<usize>) -> usize {
        x_width
    }

    fn message(&self, x_j: ArrayView1<'_, f32>, _attr: Option<ArrayView1<'_, f32>>) -> Array1<f32> {
        x_j.to_owned()
    }
}

/// `[x_j ‖ attr]`, or `x_j` alone when no attributes are supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatAttr;

impl MessagePolicy for ConcatAttr {
    fn out_width(&self, x_width: usize, attr_width: Option<usize>) -> usize {
        x_width + attr_width.unwrap_or(0)
    }

    fn message(&self, x_j: ArrayView1<'_, f32>, attr: Option<ArrayView1<'_, f32>>) -> Array1<f32> {
        match attr {
            Some(attr) => x_j.iter().chain(attr.iter()).copied().collect(),
            None => x_j.to_owned(),
        }
    }
}

/// `x_j` scaled by the first attribute column, i.e. a scalar edge weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleByAttr;

impl MessagePolicy for ScaleByAttr {
    fn out_width(&self, x_width: usize, _attr_width: Option<usize>) -> usize {
        x_width
    }

    fn message(&self, x_j: ArrayView1<'_, f32>, attr: Option<ArrayView1<'_, f32>>) -> Array1<f32> {
        let weight = attr.and_then(|a| a.get(0).copied()).unwrap_or(1.0);
        &x_j * weight
    }
}
