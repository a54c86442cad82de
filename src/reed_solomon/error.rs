//! Error types for Reed-Solomon coding

use thiserror::Error;

/// Largest shard set the GF(2^8) coder can address
pub const MAX_TOTAL_SHARDS: usize = 256;

/// Errors raised by the erasure coder itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodingError {
    #[error("Reed-Solomon needs at least one data shard")]
    NoDataShards,

    #[error("Too many shards for GF(2^8): {total} > {max}", max = MAX_TOTAL_SHARDS)]
    TooManyShards { total: usize },

    #[error("Expected {expected} shard buffers, got {got}")]
    ShardCountMismatch { expected: usize, got: usize },

    #[error("Presence map has {got} entries, expected {expected}")]
    PresenceLengthMismatch { expected: usize, got: usize },

    #[error("Shard {index} has {len} bytes, needs at least {needed}")]
    ShardTooShort {
        index: usize,
        len: usize,
        needed: usize,
    },

    #[error("Not enough shards present: need {needed}, got {present}")]
    NotEnoughShards { needed: usize, present: usize },

    #[error("Reed-Solomon matrix is singular")]
    SingularMatrix,

    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Cannot multiply {left:?} by {right:?} matrix")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// Result type for Reed-Solomon operations
pub type CodingResult<T> = Result<T, CodingError>;
