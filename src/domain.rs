//! Core domain types for shard sets
//!
//! A shard set is `data_shards + parity_shards` slots. Each shard carries its
//! slot index, which is the only thing used to place it back during decode.

use crate::error::{Result, ShardError};

/// Type-safe wrapper for a shard's slot position (0..k data, k..k+m parity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardIndex(usize);

impl ShardIndex {
    pub fn new(index: usize) -> Self {
        ShardIndex(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for ShardIndex {
    fn from(index: usize) -> Self {
        ShardIndex::new(index)
    }
}

impl From<ShardIndex> for usize {
    fn from(index: ShardIndex) -> Self {
        index.0
    }
}

impl std::fmt::Display for ShardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One fragment of an encoded buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    pub index: ShardIndex,
    pub content: Vec<u8>,
}

impl Shard {
    pub fn new(index: impl Into<ShardIndex>, content: Vec<u8>) -> Self {
        Self {
            index: index.into(),
            content,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

/// Data/parity split of a shard set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardLayout {
    data_shards: usize,
    parity_shards: usize,
}

impl ShardLayout {
    /// Create a layout. At least one data shard is required; zero parity
    /// shards is allowed and degenerates to plain splitting.
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        if data_shards == 0 || data_shards.checked_add(parity_shards).is_none() {
            return Err(ShardError::InvalidLayout {
                data_shards,
                parity_shards,
            });
        }
        Ok(Self {
            data_shards,
            parity_shards,
        })
    }

    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    pub fn is_data(&self, index: ShardIndex) -> bool {
        index.as_usize() < self.data_shards
    }

    pub fn is_parity(&self, index: ShardIndex) -> bool {
        !self.is_data(index) && index.as_usize() < self.total_shards()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rejects_zero_data_shards() {
        assert!(matches!(
            ShardLayout::new(0, 2),
            Err(ShardError::InvalidLayout {
                data_shards: 0,
                parity_shards: 2
            })
        ));
    }

    #[test]
    fn test_layout_allows_zero_parity() {
        let layout = ShardLayout::new(3, 0).unwrap();
        assert_eq!(layout.total_shards(), 3);
        assert!(!layout.is_parity(ShardIndex::new(2)));
    }

    #[test]
    fn test_layout_classifies_indices() {
        let layout = ShardLayout::new(4, 2).unwrap();
        assert!(layout.is_data(ShardIndex::new(0)));
        assert!(layout.is_data(ShardIndex::new(3)));
        assert!(layout.is_parity(ShardIndex::new(4)));
        assert!(layout.is_parity(ShardIndex::new(5)));
        assert!(!layout.is_parity(ShardIndex::new(6)));
    }

    #[test]
    fn test_shard_index_conversions() {
        let index: ShardIndex = 7usize.into();
        assert_eq!(usize::from(index), 7);
        assert_eq!(index.to_string(), "7");
    }
}
