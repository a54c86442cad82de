//! Configuration for encode/decode operations

/// Below this many bytes per shard the rayon fan-out costs more than it saves
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 64 * 1024;

/// Configuration for the erasure coder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Whether output shards may be computed on the rayon pool
    pub parallel: bool,
    /// Minimum shard length (bytes) before parallel computation kicks in
    pub min_parallel_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }
}

impl CodecConfig {
    pub fn new(parallel: bool, min_parallel_len: usize) -> Self {
        Self {
            parallel,
            min_parallel_len,
        }
    }

    /// Single-threaded everything
    pub fn sequential() -> Self {
        Self::new(false, DEFAULT_MIN_PARALLEL_LEN)
    }

    /// Whether a pass over `len` bytes per shard should fan out
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.min_parallel_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_parallel_above_threshold() {
        let config = CodecConfig::default();
        assert!(!config.use_parallel(1024));
        assert!(config.use_parallel(DEFAULT_MIN_PARALLEL_LEN));
    }

    #[test]
    fn test_sequential_never_fans_out() {
        let config = CodecConfig::sequential();
        assert!(!config.use_parallel(usize::MAX));
    }
}
