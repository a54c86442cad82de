//! Erasure-coded shard framing for byte buffers
//!
//! A buffer is split into `k` equal-size data shards, prefixed with its
//! length, and extended with `m` parity shards. Any `k` of the `k + m`
//! shards are enough to get the exact original bytes back.
//!
//! ```
//! use byte_erasure::ShardCodec;
//!
//! let codec = ShardCodec::new(4, 2)?;
//! let mut shards = codec.encode(b"fault tolerant bytes")?;
//!
//! // Lose any two shards
//! shards.remove(0);
//! shards.remove(3);
//!
//! assert_eq!(codec.decode(&shards)?, b"fault tolerant bytes");
//! # Ok::<(), byte_erasure::ShardError>(())
//! ```

pub mod codec;
pub mod coder;
pub mod config;
pub mod domain;
pub mod error;
pub mod framing;
pub mod reed_solomon;

pub use codec::{decode, encode, ShardCodec};
pub use coder::ErasureCoder;
pub use config::CodecConfig;
pub use domain::{Shard, ShardIndex, ShardLayout};
pub use error::{Result, ShardError};
pub use reed_solomon::{CodingError, ReedSolomon};
