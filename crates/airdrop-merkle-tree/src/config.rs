//! Tree construction options

use airdrop_merkle_primitives::HashKind;
use serde::{Deserialize, Serialize};

/// Layers at least this wide are hashed in parallel by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Options controlling how a tree is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Hash primitive for leaves and internal nodes
    pub hash_kind: HashKind,
    /// Minimum layer width for parallel hashing; 0 disables parallelism
    pub parallel_threshold: usize,
}

impl TreeOptions {
    /// Default options with the given hash primitive
    pub fn new(hash_kind: HashKind) -> Self {
        Self {
            hash_kind,
            ..Self::default()
        }
    }

    /// Set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Build strictly sequentially
    pub fn sequential(self) -> Self {
        self.with_parallel_threshold(0)
    }

    /// Whether a layer of `width` nodes should be hashed in parallel
    pub fn is_parallel(&self, width: usize) -> bool {
        self.parallel_threshold != 0 && width >= self.parallel_threshold
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            hash_kind: HashKind::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
