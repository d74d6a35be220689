use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by fallible table and list operations.
///
/// Lookups never produce an error: a missing key is `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A node, key copy or bucket array could not be allocated. The
    /// container is left exactly as it was before the call.
    #[error("allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),

    #[error("invalid table configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}
