//! Dual (upper/lower) neighborhood aggregation over one chain.
//!
//! For every directed edge `src -> dst` of an adjacency index, the policy
//! builds a message from `x[src]` (and attribute row `e` when attributes are
//! given) and the engine adds it into row `dst` of the output. Rows that
//! receive nothing stay zero, and an absent index yields an all-zero block of
//! the configured message width.

use crate::error::{Direction, PropagateError, Result};
use crate::policy::{MessagePolicy, SourceFeature};
use ndarray::Array2;
use simplicial_complex::{AdjacencyIndex, ChainInputs, Complex};

/// Upper and lower messages, one row per simplex each.
pub type Messages = (Array2<f32>, Array2<f32>);

#[derive(Debug, Clone)]
pub struct ChainMessagePassing<U = SourceFeature, D = SourceFeature> {
    up_msg_size: usize,
    down_msg_size: usize,
    up_policy: U,
    down_policy: D,
}

impl ChainMessagePassing {
    /// Engine whose messages are the source features along both adjacencies.
    pub fn new(up_msg_size: usize, down_msg_size: usize) -> Self {
        Self::with_policies(up_msg_size, down_msg_size, SourceFeature, SourceFeature)
    }
}

impl<U: MessagePolicy, D: MessagePolicy> ChainMessagePassing<U, D> {
    pub fn with_policies(up_msg_size: usize, down_msg_size: usize, up_policy: U, down_policy: D) -> Self {
        Self {
            up_msg_size,
            down_msg_size,
            up_policy,
            down_policy,
        }
    }

    pub fn up_msg_size(&self) -> usize {
        self.up_msg_size
    }

    pub fn down_msg_size(&self) -> usize {
        self.down_msg_size
    }

    /// Aggregate upper and lower messages for every row of `x`.
    ///
    /// Either index may be `None` (top/bottom order); the matching output is
    /// then all zeros. Errors only on malformed input: out-of-range
    /// endpoints, attribute rows that do not match the edge count, or a policy
    /// whose message width differs from the configured size.
    pub fn propagate(
        &self,
        up_index: Option<&AdjacencyIndex>,
        down_index: Option<&AdjacencyIndex>,
        x: &Array2<f32>,
        up_attr: Option<&Array2<f32>>,
        down_attr: Option<&Array2<f32>>,
    ) -> Result<Messages> {
        let up_msg = aggregate(
            &self.up_policy,
            Direction::Up,
            up_index,
            x,
            up_attr,
            self.up_msg_size,
        )?;
        let down_msg = aggregate(
            &self.down_policy,
            Direction::Down,
            down_index,
            x,
            down_attr,
            self.down_msg_size,
        )?;
        tracing::trace!(
            simplices = x.nrows(),
            up_edges = up_index.map(AdjacencyIndex::len),
            down_edges = down_index.map(AdjacencyIndex::len),
            "propagated chain messages"
        );
        Ok((up_msg, down_msg))
    }

    /// Propagate at one order of a complex, using the shared coface/face
    /// features as the up/down edge attributes.
    pub fn propagate_inputs(&self, inputs: &ChainInputs<'_>) -> Result<Messages> {
        let x = inputs.x.ok_or(PropagateError::MissingFeatures {
            order: inputs.order,
        })?;
        self.propagate(
            inputs.upper_index,
            inputs.lower_index,
            x,
            inputs.upper_features.as_ref(),
            inputs.lower_features.as_ref(),
        )
    }

    /// [`Self::propagate_inputs`] for every order, bottom to top.
    pub fn propagate_complex(&self, complex: &Complex) -> Result<Vec<Messages>> {
        let messages = (complex.min_order()..=complex.max_order())
            .map(|order| {
                let inputs = complex.get_inputs(order)?;
                self.propagate_inputs(&inputs)
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(orders = messages.len(), "propagated complex");
        Ok(messages)
    }
}

fn aggregate<P: MessagePolicy>(
    policy: &P,
    direction: Direction,
    index: Option<&AdjacencyIndex>,
    x: &Array2<f32>,
    attr: Option<&Array2<f32>>,
    msg_size: usize,
) -> Result<Array2<f32>> {
    let num_simplices = x.nrows();
    let mut out = Array2::<f32>::zeros((num_simplices, msg_size));
    let Some(index) = index else {
        return Ok(out);
    };

    if let Some(attr) = attr {
        if attr.nrows() != index.len() {
            return Err(PropagateError::AttrRowMismatch {
                direction,
                rows: attr.nrows(),
                edges: index.len(),
            });
        }
    }
    let width = policy.out_width(x.ncols(), attr.map(|a| a.ncols()));
    if width != msg_size {
        return Err(PropagateError::MessageWidthMismatch {
            direction,
            expected: msg_size,
            actual: width,
        });
    }

    for (edge, (src, dst)) in index.iter().enumerate() {
        for endpoint in [src, dst] {
            if endpoint >= num_simplices {
                return Err(PropagateError::EndpointOutOfRange {
                    direction,
                    edge,
                    endpoint,
                    num_simplices,
                });
            }
        }
        let msg = policy.message(x.row(src), attr.map(|a| a.row(edge)));
        let mut row = out.row_mut(dst);
        row += &msg;
    }
    Ok(out)
}
