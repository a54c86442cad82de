//! End-to-end tests for encoding and decoding through ShardCodec
//!
//! Covers round trips with and without shard loss, the decode threshold and
//! the shard size invariant.

use byte_erasure::framing;
use byte_erasure::{decode, encode, Shard, ShardCodec, ShardError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Every subset of `shards` with exactly `size` members
fn subsets_of_size(shards: &[Shard], size: usize) -> Vec<Vec<Shard>> {
    (0u32..(1 << shards.len()))
        .filter(|mask| mask.count_ones() as usize == size)
        .map(|mask| {
            shards
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| s.clone())
                .collect()
        })
        .collect()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_all_shards() {
    init_logging();
    for (len, k, m) in [(0, 1, 0), (1, 1, 1), (100, 3, 2), (96, 4, 2), (97, 4, 2), (1000, 10, 4)] {
        let data = random_bytes(len, len as u64);
        let shards = encode(&data, k, m).unwrap();
        assert_eq!(decode(&shards, k, m).unwrap(), data, "len={len}, k={k}, m={m}");
    }
}

#[test]
fn test_round_trip_divisible_and_non_divisible_lengths() {
    // (len + 4) divisible by k, and one byte either side
    let codec = ShardCodec::new(4, 2).unwrap();
    for len in [59, 60, 61] {
        let data = random_bytes(len, 7);
        let shards = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&shards[2..]).unwrap(), data, "len={len}");
    }
}

#[test]
fn test_zero_parity_round_trip() {
    let codec = ShardCodec::new(5, 0).unwrap();
    let data = random_bytes(333, 3);
    let shards = codec.encode(&data).unwrap();
    assert_eq!(shards.len(), 5);
    assert_eq!(codec.decode(&shards).unwrap(), data);
}

#[test]
fn test_every_quorum_decodes() {
    let codec = ShardCodec::new(3, 3).unwrap();
    let data = random_bytes(250, 11);
    let shards = codec.encode(&data).unwrap();

    for subset in subsets_of_size(&shards, 3) {
        let indices: Vec<usize> = subset.iter().map(|s| s.index.as_usize()).collect();
        assert_eq!(codec.decode(&subset).unwrap(), data, "shards {indices:?}");
    }
}

#[test]
fn test_more_than_k_shards_decodes() {
    let codec = ShardCodec::new(4, 3).unwrap();
    let data = random_bytes(500, 5);
    let shards = codec.encode(&data).unwrap();

    // Drop a data shard but keep all parity: k + 2 shards supplied
    let subset: Vec<Shard> = shards.into_iter().filter(|s| s.index.as_usize() != 1).collect();
    assert_eq!(codec.decode(&subset).unwrap(), data);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_large_buffer_survives_six_losses() {
    init_logging();
    let data = random_bytes(1_050_000, 42);
    let codec = ShardCodec::new(12, 6).unwrap();
    let shards = codec.encode(&data).unwrap();

    assert_eq!(shards.len(), 18);
    assert!(shards.iter().all(|s| s.len() == 87_501));

    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..4 {
        let mut remaining = shards.clone();
        for _ in 0..6 {
            let victim = rng.random_range(0..remaining.len());
            remaining.remove(victim);
        }
        assert_eq!(remaining.len(), 12);
        assert_eq!(codec.decode(&remaining).unwrap(), data);
    }

    // Worst case: six data shards gone
    let no_leading_data: Vec<Shard> = shards[6..].to_vec();
    assert_eq!(codec.decode(&no_leading_data).unwrap(), data);
}

#[test]
fn test_empty_buffer_any_four_of_six() {
    let codec = ShardCodec::new(4, 2).unwrap();
    let shards = codec.encode(&[]).unwrap();

    assert_eq!(shards.len(), 6);
    assert!(shards.iter().all(|s| s.len() == 1));

    for subset in subsets_of_size(&shards, 4) {
        assert!(codec.decode(&subset).unwrap().is_empty());
    }
}

#[test]
fn test_three_shards_when_four_needed() {
    let codec = ShardCodec::new(4, 2).unwrap();
    let shards = codec.encode(b"not enough").unwrap();

    let err = codec.decode(&shards[..3]).unwrap_err();
    assert!(matches!(
        err,
        ShardError::InsufficientShards { needed: 4, got: 3 }
    ));
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_threshold_never_returns_data() {
    let codec = ShardCodec::new(5, 3).unwrap();
    let data = random_bytes(321, 9);
    let mut shards = codec.encode(&data).unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    for keep in 0..5 {
        shards.shuffle(&mut rng);
        let result = codec.decode(&shards[..keep]);
        assert!(
            matches!(result, Err(ShardError::InsufficientShards { needed: 5, got }) if got == keep)
        );
    }
}

#[test]
fn test_shard_size_invariant() {
    for (len, k) in [(0usize, 1usize), (0, 7), (3, 2), (1024, 3), (4093, 8)] {
        let shards = encode(&random_bytes(len, 1), k, 2).unwrap();
        let expected = (len + 4).div_ceil(k);
        assert_eq!(framing::shard_size(len, k).unwrap(), expected);
        assert!(shards.iter().all(|s| s.len() == expected), "len={len}, k={k}");
    }
}

#[test]
fn test_data_shards_carry_length_prefix() {
    let data = random_bytes(40, 2);
    let shards = encode(&data, 4, 2).unwrap();

    assert_eq!(&shards[0].content[..4], &40u32.to_be_bytes());
    assert_eq!(&shards[0].content[4..], &data[..shards[0].len() - 4]);
}

#[test]
fn test_corrupt_data_shard_is_reported() {
    let codec = ShardCodec::new(2, 1).unwrap();
    let mut shards = codec.encode(b"abcdef").unwrap();
    // Claim more payload than the shards can hold
    shards[0].content[..4].copy_from_slice(&u32::MAX.to_be_bytes());

    assert!(matches!(
        codec.decode(&shards[..2]),
        Err(ShardError::CorruptLengthPrefix { .. })
    ));
}
