//! Error types for shard encoding and decoding

use crate::reed_solomon::CodingError;
use thiserror::Error;

/// Errors that can occur while framing, encoding or decoding shards
#[derive(Debug, Error)]
pub enum ShardError {
    /// Layout cannot describe any shard set (no data shards)
    #[error("Invalid shard layout: {data_shards} data shards, {parity_shards} parity shards")]
    InvalidLayout {
        data_shards: usize,
        parity_shards: usize,
    },

    /// Input does not fit the 4-byte length prefix
    #[error("Payload of {len} bytes exceeds the {max} byte limit of the length prefix")]
    PayloadTooLarge { len: usize, max: usize },

    /// Fewer shards than data shards were supplied
    #[error("Cannot decode: need {needed} shards but only {got} supplied")]
    InsufficientShards { needed: usize, got: usize },

    /// A shard's content length disagrees with the rest of the set
    #[error("Shard {index} has {actual} bytes, expected {expected}")]
    InconsistentShardSize {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Shard index falls outside `0..total_shards`
    #[error("Shard index {index} out of range for {total} shards")]
    ShardIndexOutOfRange { index: usize, total: usize },

    /// The same shard index was supplied more than once
    #[error("Shard index {0} supplied more than once")]
    DuplicateShardIndex(usize),

    /// Data shards are too short to hold the length prefix
    #[error("Data shards hold {available} bytes, too short for the length prefix")]
    MissingLengthPrefix { available: usize },

    /// Length prefix points past the end of the data shards
    #[error("Corrupt length prefix: {length} bytes claimed, at most {max} available")]
    CorruptLengthPrefix { length: u64, max: usize },

    /// Full shard set required (verification)
    #[error("Expected all {expected} shards, got {got}")]
    IncompleteShardSet { expected: usize, got: usize },

    /// The erasure coder failed
    #[error("Erasure coding failed: {0}")]
    Coding(#[from] CodingError),
}

/// Type alias for Result with ShardError
pub type Result<T> = std::result::Result<T, ShardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_shards_message() {
        let err = ShardError::InsufficientShards { needed: 4, got: 3 };
        assert_eq!(
            err.to_string(),
            "Cannot decode: need 4 shards but only 3 supplied"
        );
    }

    #[test]
    fn test_coding_error_converts() {
        let err: ShardError = CodingError::SingularMatrix.into();
        assert!(matches!(err, ShardError::Coding(CodingError::SingularMatrix)));
    }
}
