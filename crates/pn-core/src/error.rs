//! Framework error type.
//!
//! Only structural contract violations are errors.  Pool exhaustion and
//! zero-mass matrix rows are resolved in place by the samplers and never
//! surface here.

use thiserror::Error;

use crate::PersonId;

/// The top-level error type for `pn-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PnError {
    #[error("{which} is empty; both groups must be populated")]
    EmptyGroup { which: &'static str },

    #[error("average degree {degree} is below 2; the graph would tend to be disconnected")]
    DegreeTooLow { degree: usize },

    #[error("contact matrix is {got}x{got} but there are {expected} age brackets")]
    MatrixShape { expected: usize, got: usize },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("person {0} not found")]
    UnknownPerson(PersonId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pn-*` crates.
pub type PnResult<T> = Result<T, PnError>;
