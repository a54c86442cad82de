//! The erasure coding capability consumed by [`ShardCodec`](crate::ShardCodec)
//!
//! The codec only lays out buffers and tracks presence; the finite-field work
//! is delegated to an [`ErasureCoder`]. [`ReedSolomon`](crate::ReedSolomon) is
//! the default implementation. Tests and callers with special needs can plug
//! in their own.

use crate::reed_solomon::{check_shard_buffers, CodingResult};

/// Parity generation and reconstruction over a fixed `k + m` shard set
///
/// Every method receives all `k + m` buffers in index order (data first,
/// parity after) and only touches bytes `offset..offset + len` of each.
pub trait ErasureCoder: Send + Sync {
    /// Number of data shards (`k`)
    fn data_shard_count(&self) -> usize;

    /// Number of parity shards (`m`)
    fn parity_shard_count(&self) -> usize;

    fn total_shard_count(&self) -> usize {
        self.data_shard_count() + self.parity_shard_count()
    }

    /// Fill buffers `k..k+m` with parity computed from buffers `0..k`.
    fn encode_parity(&self, shards: &mut [Vec<u8>], offset: usize, len: usize)
        -> CodingResult<()>;

    /// Fill every buffer whose `present` flag is false.
    ///
    /// Must succeed whenever at least `k` buffers are present. Afterwards the
    /// data buffers hold their encode-time content.
    fn reconstruct_missing(
        &self,
        shards: &mut [Vec<u8>],
        present: &[bool],
        offset: usize,
        len: usize,
    ) -> CodingResult<()>;

    /// Check that the parity buffers match the data buffers.
    fn verify_parity(&self, shards: &[Vec<u8>], offset: usize, len: usize) -> CodingResult<bool> {
        let k = self.data_shard_count();
        check_shard_buffers(shards, self.total_shard_count(), offset, len)?;

        let mut expected = shards.to_vec();
        for parity in &mut expected[k..] {
            parity[offset..offset + len].fill(0);
        }
        self.encode_parity(&mut expected, offset, len)?;

        Ok(expected[k..]
            .iter()
            .zip(&shards[k..])
            .all(|(want, got)| want[offset..offset + len] == got[offset..offset + len]))
    }
}

impl<C: ErasureCoder + ?Sized> ErasureCoder for Box<C> {
    fn data_shard_count(&self) -> usize {
        (**self).data_shard_count()
    }

    fn parity_shard_count(&self) -> usize {
        (**self).parity_shard_count()
    }

    fn encode_parity(
        &self,
        shards: &mut [Vec<u8>],
        offset: usize,
        len: usize,
    ) -> CodingResult<()> {
        (**self).encode_parity(shards, offset, len)
    }

    fn reconstruct_missing(
        &self,
        shards: &mut [Vec<u8>],
        present: &[bool],
        offset: usize,
        len: usize,
    ) -> CodingResult<()> {
        (**self).reconstruct_missing(shards, present, offset, len)
    }

    fn verify_parity(&self, shards: &[Vec<u8>], offset: usize, len: usize) -> CodingResult<bool> {
        (**self).verify_parity(shards, offset, len)
    }
}
