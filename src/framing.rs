//! Shard framing: how a byte buffer maps onto `k` equal-size data shards
//!
//! The data shards, concatenated in index order, form one stream:
//!
//! ```text
//! [ len: u32 BE ][ payload bytes ... ][ zero padding ]
//! |<------------- k * shard_size bytes ------------->|
//! ```
//!
//! Shard `i` holds stream bytes `i * shard_size .. (i + 1) * shard_size`.
//! With the usual shard sizes the prefix sits entirely in shard 0 and shard
//! `i > 0` starts at payload offset `i * shard_size - 4`. For tiny payloads
//! spread over many shards (`shard_size < 4`) the prefix spills into the
//! following shards.

use crate::error::{Result, ShardError};

/// Size of the big-endian length header at the start of the stream
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest payload the 4-byte prefix can describe; chunk larger inputs upstream
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// Shard size for a payload of `original_len` bytes split across `data_shards`
///
/// `ceil((original_len + 4) / data_shards)`, so the prefixed payload fits the
/// data shards with at most `data_shards - 1` bytes of padding.
pub fn shard_size(original_len: usize, data_shards: usize) -> Result<usize> {
    if data_shards == 0 {
        return Err(ShardError::InvalidLayout {
            data_shards,
            parity_shards: 0,
        });
    }
    let stored = check_payload_len(original_len)?;
    Ok(stored.div_ceil(data_shards))
}

/// Payload length plus prefix, rejecting anything the prefix cannot encode
fn check_payload_len(len: usize) -> Result<usize> {
    if len > MAX_PAYLOAD_LEN {
        return Err(ShardError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }
    len.checked_add(LENGTH_PREFIX_LEN)
        .ok_or(ShardError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        })
}

/// Lay `bytes` out as `data_shards` length-prefixed shards of `shard_size` bytes
pub fn build_data_shards(
    bytes: &[u8],
    data_shards: usize,
    shard_size: usize,
) -> Result<Vec<Vec<u8>>> {
    let stored = check_payload_len(bytes.len())?;
    let capacity = data_shards.saturating_mul(shard_size);
    if capacity < stored {
        return Err(ShardError::PayloadTooLarge {
            len: bytes.len(),
            max: capacity.saturating_sub(LENGTH_PREFIX_LEN),
        });
    }

    let prefix = (bytes.len() as u32).to_be_bytes();
    let shards = (0..data_shards)
        .map(|i| {
            let mut shard = vec![0u8; shard_size];
            fill_shard(&mut shard, i * shard_size, &prefix, bytes);
            shard
        })
        .collect();

    Ok(shards)
}

/// Copy stream bytes starting at stream offset `start` into `shard`.
/// Anything past the end of the payload stays zero.
fn fill_shard(shard: &mut [u8], start: usize, prefix: &[u8; LENGTH_PREFIX_LEN], bytes: &[u8]) {
    let mut filled = 0;
    if start < LENGTH_PREFIX_LEN {
        filled = (LENGTH_PREFIX_LEN - start).min(shard.len());
        shard[..filled].copy_from_slice(&prefix[start..start + filled]);
        if filled == shard.len() {
            return;
        }
    }

    let payload_start = start + filled - LENGTH_PREFIX_LEN;
    if payload_start >= bytes.len() {
        return;
    }
    let payload_end = (payload_start + shard.len() - filled).min(bytes.len());
    let count = payload_end - payload_start;
    shard[filled..filled + count].copy_from_slice(&bytes[payload_start..payload_end]);
}

/// Concatenate data shards, read the length prefix and return the payload
///
/// Every shard must be exactly `shard_size` bytes.
pub fn reassemble<S: AsRef<[u8]>>(data_shards: &[S], shard_size: usize) -> Result<Vec<u8>> {
    for (index, shard) in data_shards.iter().enumerate() {
        let actual = shard.as_ref().len();
        if actual != shard_size {
            return Err(ShardError::InconsistentShardSize {
                index,
                expected: shard_size,
                actual,
            });
        }
    }

    let available = data_shards.len() * shard_size;
    if available < LENGTH_PREFIX_LEN {
        return Err(ShardError::MissingLengthPrefix { available });
    }

    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    let stream = data_shards.iter().flat_map(|s| s.as_ref().iter());
    for (dst, &src) in prefix.iter_mut().zip(stream) {
        *dst = src;
    }

    let length = u32::from_be_bytes(prefix) as u64;
    let max = available - LENGTH_PREFIX_LEN;
    if length > max as u64 {
        return Err(ShardError::CorruptLengthPrefix { length, max });
    }
    let length = length as usize;

    let mut payload = Vec::with_capacity(length);
    let mut skip = LENGTH_PREFIX_LEN;
    for shard in data_shards {
        if payload.len() == length {
            break;
        }
        let shard = shard.as_ref();
        let from = skip.min(shard.len());
        skip -= from;
        let take = (length - payload.len()).min(shard.len() - from);
        payload.extend_from_slice(&shard[from..from + take]);
    }

    Ok(payload)
}
