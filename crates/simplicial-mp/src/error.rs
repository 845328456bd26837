use simplicial_complex::ComplexError;
use std::fmt;

pub type Result<T, E = PropagateError> = std::result::Result<T, E>;

/// Which adjacency a message travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Malformed propagation input. Absent adjacency indices are never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropagateError {
    #[error("{direction} edge {edge} references simplex {endpoint}, but x has {num_simplices} rows")]
    EndpointOutOfRange {
        direction: Direction,
        edge: usize,
        endpoint: usize,
        num_simplices: usize,
    },

    #[error("{direction} attributes have {rows} rows for {edges} edges")]
    AttrRowMismatch {
        direction: Direction,
        rows: usize,
        edges: usize,
    },

    #[error("{direction} messages are {actual} wide, expected {expected}")]
    MessageWidthMismatch {
        direction: Direction,
        expected: usize,
        actual: usize,
    },

    #[error("no features at order {order}")]
    MissingFeatures { order: usize },

    #[error(transparent)]
    Complex(#[from] ComplexError),
}
