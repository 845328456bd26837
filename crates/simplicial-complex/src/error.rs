//! Errors raised while building or querying chains and complexes.

/// Result alias used across the crate.
pub type Result<T, E = ComplexError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplexError {
    /// A query named an order outside `[min_order, max_order]`.
    #[error("order {order} is not present in the complex or not yet supported (orders {min_order}..={max_order})")]
    UnsupportedOrder {
        order: usize,
        min_order: usize,
        max_order: usize,
    },

    /// An adjacency edge claims a face/coface relation the mappings do not support.
    #[error("malformed complex at order {order}, edge {edge}: {reason}")]
    MalformedConsolidation {
        order: usize,
        edge: usize,
        reason: String,
    },

    #[error("invalid {order}-chain: {message}")]
    InvalidChain { order: usize, message: String },

    #[error("invalid complex: {0}")]
    InvalidComplex(String),

    #[error("invalid simplex {nodes:?}: {message}")]
    InvalidSimplex { nodes: Vec<u32>, message: String },

    #[error("adjacency index has {src} sources but {dst} targets")]
    MismatchedIndex { src: usize, dst: usize },

    #[error("invalid orientation: {0}")]
    InvalidOrientation(String),
}

impl ComplexError {
    pub(crate) fn chain(order: usize, message: impl Into<String>) -> Self {
        Self::InvalidChain {
            order,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(order: usize, edge: usize, reason: impl Into<String>) -> Self {
        Self::MalformedConsolidation {
            order,
            edge,
            reason: reason.into(),
        }
    }
}
