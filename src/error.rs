//! Error type for heap operations.

use thiserror::Error;

/// Errors raised by heap and ring operations.
///
/// All errors are raised synchronously at the point of violation; no operation
/// retries internally, and validated operations either complete fully or
/// return an error before mutating shared structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The priority cannot serve as an ordering key (for floats: NaN).
    #[error("priority is not a valid ordering key")]
    InvalidPriority,

    /// `extract_min` was called on an empty heap.
    #[error("cannot extract the minimum of an empty heap")]
    EmptyHeap,

    /// The handle refers to a node that is no longer in the heap
    /// (already extracted, deleted, or issued by a consumed heap).
    #[error("handle is no longer valid (node was removed)")]
    InvalidHandle,

    /// A structural operation was applied to a state that cannot support it,
    /// such as removing a node from an empty ring.
    #[error("invalid structural operation: {0}")]
    InvalidOperation(&'static str),
}
