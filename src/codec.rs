//! Shard coordinator: encode a buffer into `k + m` shards and decode it back
//!
//! Encoding lays out the data shards with [`framing`](crate::framing), then
//! asks the [`ErasureCoder`] to fill the parity shards. Decoding places the
//! supplied shards into their slots, lets the coder rebuild the absent ones
//! and reassembles the data shards.
//!
//! Both operations are pure functions of their inputs. A `ShardCodec` holds
//! no per-call state and can be shared across threads.

use crate::coder::ErasureCoder;
use crate::config::CodecConfig;
use crate::domain::{Shard, ShardLayout};
use crate::error::{Result, ShardError};
use crate::framing;
use crate::reed_solomon::ReedSolomon;
use log::debug;
use rustc_hash::FxHashMap as HashMap;

/// Encodes and decodes byte buffers for one data/parity layout
#[derive(Debug, Clone)]
pub struct ShardCodec<C = ReedSolomon> {
    layout: ShardLayout,
    coder: C,
}

impl ShardCodec<ReedSolomon> {
    /// Codec backed by the built-in Reed-Solomon coder
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        Self::with_config(data_shards, parity_shards, CodecConfig::default())
    }

    pub fn with_config(
        data_shards: usize,
        parity_shards: usize,
        config: CodecConfig,
    ) -> Result<Self> {
        let layout = ShardLayout::new(data_shards, parity_shards)?;
        let coder = ReedSolomon::with_config(data_shards, parity_shards, config)?;
        Ok(Self { layout, coder })
    }
}

impl<C: ErasureCoder> ShardCodec<C> {
    /// Codec backed by a caller-supplied coder; the layout comes from the coder
    pub fn with_coder(coder: C) -> Result<Self> {
        let layout = ShardLayout::new(coder.data_shard_count(), coder.parity_shard_count())?;
        Ok(Self { layout, coder })
    }

    pub fn layout(&self) -> ShardLayout {
        self.layout
    }

    pub fn coder(&self) -> &C {
        &self.coder
    }

    /// Split `bytes` into `k` data shards and `m` parity shards
    ///
    /// Returns one shard per index `0..k+m`, all of the same length.
    pub fn encode(&self, bytes: &[u8]) -> Result<Vec<Shard>> {
        let k = self.layout.data_shards();
        let shard_size = framing::shard_size(bytes.len(), k)?;

        let mut shards = framing::build_data_shards(bytes, k, shard_size)?;
        shards.extend((0..self.layout.parity_shards()).map(|_| vec![0u8; shard_size]));
        self.coder.encode_parity(&mut shards, 0, shard_size)?;

        debug!(
            "Encoded {} bytes into {} data + {} parity shards of {} bytes",
            bytes.len(),
            k,
            self.layout.parity_shards(),
            shard_size
        );

        Ok(shards
            .into_iter()
            .enumerate()
            .map(|(index, content)| Shard::new(index, content))
            .collect())
    }

    /// Rebuild the original buffer from any `k` or more shards
    pub fn decode(&self, shards: &[Shard]) -> Result<Vec<u8>> {
        let k = self.layout.data_shards();
        let total = self.layout.total_shards();

        if shards.len() < k {
            return Err(ShardError::InsufficientShards {
                needed: k,
                got: shards.len(),
            });
        }

        let by_index = self.index_shards(shards)?;
        let shard_size = common_shard_size(shards)?;

        // All data shards on hand: nothing to reconstruct
        let data: Option<Vec<&[u8]>> = (0..k)
            .map(|i| by_index.get(&i).map(|s| s.content.as_slice()))
            .collect();
        if let Some(data) = data {
            debug!("All {} data shards present, skipping reconstruction", k);
            return framing::reassemble(&data, shard_size);
        }

        let mut slots = Vec::with_capacity(total);
        let mut present = Vec::with_capacity(total);
        for index in 0..total {
            match by_index.get(&index) {
                Some(shard) => {
                    slots.push(shard.content.clone());
                    present.push(true);
                }
                None => {
                    slots.push(vec![0u8; shard_size]);
                    present.push(false);
                }
            }
        }

        debug!(
            "Decoding from {} of {} shards ({} bytes each)",
            shards.len(),
            total,
            shard_size
        );

        self.coder
            .reconstruct_missing(&mut slots, &present, 0, shard_size)?;

        slots.truncate(k);
        framing::reassemble(&slots, shard_size)
    }

    /// Check that the parity shards of a complete set agree with its data shards
    pub fn verify(&self, shards: &[Shard]) -> Result<bool> {
        let total = self.layout.total_shards();
        if shards.len() != total {
            return Err(ShardError::IncompleteShardSet {
                expected: total,
                got: shards.len(),
            });
        }

        let by_index = self.index_shards(shards)?;
        let shard_size = common_shard_size(shards)?;

        let mut slots = Vec::with_capacity(total);
        for index in 0..total {
            let shard = by_index.get(&index).ok_or(ShardError::IncompleteShardSet {
                expected: total,
                got: by_index.len(),
            })?;
            slots.push(shard.content.clone());
        }

        Ok(self.coder.verify_parity(&slots, 0, shard_size)?)
    }

    /// Map slot index to shard, rejecting out-of-range and repeated indices
    fn index_shards<'a>(&self, shards: &'a [Shard]) -> Result<HashMap<usize, &'a Shard>> {
        let total = self.layout.total_shards();
        let mut by_index = HashMap::default();
        by_index.reserve(shards.len());

        for shard in shards {
            let index = shard.index.as_usize();
            if index >= total {
                return Err(ShardError::ShardIndexOutOfRange { index, total });
            }
            if by_index.insert(index, shard).is_some() {
                return Err(ShardError::DuplicateShardIndex(index));
            }
        }

        Ok(by_index)
    }
}

/// Shard size shared by every shard, taken from the first one
fn common_shard_size(shards: &[Shard]) -> Result<usize> {
    let expected = shards.first().map(Shard::len).unwrap_or(0);
    match shards.iter().find(|s| s.len() != expected) {
        Some(shard) => Err(ShardError::InconsistentShardSize {
            index: shard.index.as_usize(),
            expected,
            actual: shard.len(),
        }),
        None => Ok(expected),
    }
}

/// Encode `bytes` with the built-in Reed-Solomon coder
pub fn encode(bytes: &[u8], data_shards: usize, parity_shards: usize) -> Result<Vec<Shard>> {
    ShardCodec::new(data_shards, parity_shards)?.encode(bytes)
}

/// Decode shards produced by [`encode`] with the same shard counts
pub fn decode(shards: &[Shard], data_shards: usize, parity_shards: usize) -> Result<Vec<u8>> {
    ShardCodec::new(data_shards, parity_shards)?.decode(shards)
}
