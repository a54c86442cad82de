//! Reed-Solomon Error Correction Module
//!
//! Default [`ErasureCoder`](crate::ErasureCoder) implementation. Arithmetic is
//! done in GF(2^8), one byte per symbol, which caps a shard set at 256 shards.

pub mod codec;
pub mod error;
pub mod galois;
pub mod matrix;

pub use codec::{check_shard_buffers, ReedSolomon};
pub use error::{CodingError, CodingResult, MAX_TOTAL_SHARDS};
pub use galois::{build_mul_table, Galois8, MulTable};
pub use matrix::Matrix;
