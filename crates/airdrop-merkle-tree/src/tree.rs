//! Binary Merkle tree over airdrop leaf commitments
//!
//! Layer 0 holds the leaf commitments in input order, the last layer holds the
//! root. Adjacent nodes are paired left to right and hashed positionally with
//! `compress(left, right)`. When a layer has an odd number of nodes, the last
//! node is paired with [`PADDING_NODE`] as its right sibling, so layer `i + 1`
//! always has `ceil(len(layer_i) / 2)` nodes and no padding leaves are ever
//! stored.
//!
//! The padding digest is reserved: it is never accepted as a leaf, and it only
//! ever appears as a right sibling. An unpaired node therefore cannot be
//! proven at the phantom index next to it.

use crate::config::TreeOptions;
use crate::error::{MerkleError, MerkleResult};
use airdrop_merkle_primitives::{encode_leaf, encode_leaves, Hash256, HashKind, Record};
use rayon::prelude::*;
use tracing::debug;

/// Right sibling of the unpaired last node of an odd layer
pub const PADDING_NODE: Hash256 = Hash256::zero();

/// An immutable Merkle tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Primitive used for every node
    hash_kind: HashKind,

    /// All layers, leaves first, root last
    layers: Vec<Vec<Hash256>>,

    /// Records behind the leaves, when the tree was built from records
    records: Option<Vec<Record>>,
}

impl MerkleTree {
    /// Build a tree from pre-computed leaf commitments
    pub fn build(leaves: Vec<Hash256>, hash_kind: HashKind) -> MerkleResult<Self> {
        Self::build_with_options(leaves, &TreeOptions::new(hash_kind))
    }

    /// Build a tree from pre-computed leaf commitments with explicit options
    pub fn build_with_options(leaves: Vec<Hash256>, options: &TreeOptions) -> MerkleResult<Self> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        if let Some(index) = leaves.iter().position(|leaf| *leaf == PADDING_NODE) {
            return Err(MerkleError::ReservedLeaf { index });
        }
        let layers = build_layers(leaves, options);
        let tree = Self {
            hash_kind: options.hash_kind,
            layers,
            records: None,
        };
        debug!(
            hash_kind = %tree.hash_kind,
            leaf_count = tree.leaf_count(),
            depth = tree.depth(),
            root = %tree.root(),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Encode and hash records, then build the tree
    pub fn from_records(records: &[Record], hash_kind: HashKind) -> MerkleResult<Self> {
        Self::from_records_with_options(records, &TreeOptions::new(hash_kind))
    }

    /// Encode and hash records, then build the tree with explicit options
    pub fn from_records_with_options(
        records: &[Record],
        options: &TreeOptions,
    ) -> MerkleResult<Self> {
        let leaves = if options.is_parallel(records.len()) {
            records
                .par_iter()
                .map(|r| encode_leaf(r, options.hash_kind))
                .collect()
        } else {
            encode_leaves(records, options.hash_kind)
        };
        let mut tree = Self::build_with_options(leaves, options)?;
        tree.records = Some(records.to_vec());
        Ok(tree)
    }

    /// Assemble a tree from layers that the caller has already validated
    pub(crate) fn from_parts(
        hash_kind: HashKind,
        layers: Vec<Vec<Hash256>>,
        records: Option<Vec<Record>>,
    ) -> Self {
        Self {
            hash_kind,
            layers,
            records,
        }
    }

    /// The root hash
    pub fn root(&self) -> Hash256 {
        // Layers are never empty and the last one holds exactly one node.
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default()
    }

    /// Hash primitive used by this tree
    pub fn hash_kind(&self) -> HashKind {
        self.hash_kind
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.layers.first().map_or(0, Vec::len)
    }

    /// Number of layers above the leaves (proof length)
    pub fn depth(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// All layers (0 = leaves, last = root)
    pub fn layers(&self) -> &[Vec<Hash256>] {
        &self.layers
    }

    /// Nodes at a specific layer
    pub fn layer(&self, level: usize) -> Option<&[Hash256]> {
        self.layers.get(level).map(Vec::as_slice)
    }

    /// Leaf commitments in input order
    pub fn leaves(&self) -> &[Hash256] {
        self.layer(0).unwrap_or(&[])
    }

    /// Leaf commitment at `index`
    pub fn leaf(&self, index: usize) -> Option<Hash256> {
        self.leaves().get(index).copied()
    }

    /// Records behind the leaves, if known
    pub fn records(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }
}

/// Build every layer from the leaves up to the root
pub fn build_layers(leaves: Vec<Hash256>, options: &TreeOptions) -> Vec<Vec<Hash256>> {
    let mut layers = vec![leaves];
    while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
        let next = next_layer(current, options.hash_kind, options.is_parallel(current.len()));
        layers.push(next);
    }
    layers
}

/// Hash one layer into its parent layer
pub fn next_layer(layer: &[Hash256], hash_kind: HashKind, parallel: bool) -> Vec<Hash256> {
    if parallel {
        layer
            .par_chunks(2)
            .map(|pair| hash_pair(pair, hash_kind))
            .collect()
    } else {
        layer
            .chunks(2)
            .map(|pair| hash_pair(pair, hash_kind))
            .collect()
    }
}

/// Hash an adjacent pair; an unpaired node is hashed with the padding digest
fn hash_pair(pair: &[Hash256], hash_kind: HashKind) -> Hash256 {
    let left = &pair[0];
    let right = pair.get(1).unwrap_or(&PADDING_NODE);
    hash_kind.compress(left, right)
}
