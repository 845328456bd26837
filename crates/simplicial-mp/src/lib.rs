//! Message passing over simplicial chains.
//!
//! A chain of order `k` exchanges messages along two adjacencies at once:
//! upper (both simplices are faces of a common `k+1`-simplex) and lower (both
//! share a common `k-1`-face). [`ChainMessagePassing::propagate`] returns the
//! two summed message blocks separately so layers can mix them freely.
//!
//! ```no_run
//! use simplicial_complex::dummy::house_complex;
//! use simplicial_mp::ChainMessagePassing;
//!
//! let house = house_complex()?;
//! let inputs = house.get_inputs(1)?;
//! let (up_msg, down_msg) = ChainMessagePassing::new(1, 1).propagate_inputs(&inputs)?;
//! assert_eq!(up_msg.nrows(), down_msg.nrows());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::{ChainMessagePassing, Messages};
pub use error::{Direction, PropagateError, Result};
pub use policy::{ConcatAttr, MessagePolicy, ScaleByAttr, SourceFeature};
