//! Sort engine error types.

use thiserror::Error;

/// Errors that can occur when starting an instrumented sort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// The engine was given nothing to sort.
    #[error("cannot sort an empty sequence")]
    EmptySequence,
}
