use std::collections::TryReserveError;

use thiserror::Error;
use tracing::debug;

/// Errors produced by container operations
#[derive(Debug, Error)]
pub enum Error {
    /// The allocator could not provide storage for a container
    #[error("failed to allocate {kind} container with capacity {capacity}")]
    Alloc {
        kind: &'static str,
        capacity: usize,
        #[source]
        source: TryReserveError
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn alloc(kind: &'static str, capacity: usize, source: TryReserveError) -> Self {
        debug!(kind, capacity, "container allocation failed");

        Error::Alloc {
            kind,
            capacity,
            source
        }
    }
}
