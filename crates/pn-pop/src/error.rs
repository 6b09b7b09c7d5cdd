use pn_core::PnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopError {
    #[error(transparent)]
    Core(#[from] PnError),

    #[error("{what} length {got} does not match population size {expected}")]
    AgeCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

pub type PopResult<T> = Result<T, PopError>;
