//! Inclusion proofs
//!
//! A proof is the ordered list of sibling digests from the leaf layer up to
//! the layer just below the root. Each step records on which side the sibling
//! sits relative to the running node, so the verifier never has to guess the
//! pair order.

use crate::error::{MerkleError, MerkleResult};
use crate::tree::{MerkleTree, PADDING_NODE};
use crate::verify;
use airdrop_merkle_primitives::{Hash256, HashKind, Record};
use serde::{Deserialize, Serialize};

/// Position of a sibling relative to the node being proven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left input: `compress(sibling, node)`
    Left,
    /// Sibling is the right input: `compress(node, sibling)`
    Right,
}

impl Side {
    /// Side of the sibling for a node at `index` within its layer
    pub fn of_sibling(index: usize) -> Self {
        if index.is_multiple_of(2) {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// One level of an inclusion proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest at this level
    pub sibling: Hash256,
    /// Where the sibling sits
    pub side: Side,
}

/// A Merkle inclusion proof for one leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// Index of the leaf being proven
    pub leaf_index: usize,
    /// Hash primitive the proof was generated with
    pub hash_kind: HashKind,
    /// Steps from the leaf layer towards the root
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    /// Number of steps (tree depth)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for the proof of a single-leaf tree
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sibling digests in order
    pub fn siblings(&self) -> Vec<Hash256> {
        self.steps.iter().map(|step| step.sibling).collect()
    }

    /// Sibling sides in order
    pub fn sides(&self) -> Vec<Side> {
        self.steps.iter().map(|step| step.side).collect()
    }

    /// Verify a record against `root` using this proof's own hash kind
    pub fn verify(&self, root: &Hash256, record: &Record) -> MerkleResult<bool> {
        verify::verify(root, record, self.leaf_index, self, self.hash_kind)
    }

    /// Verify a pre-hashed leaf against `root` using this proof's own hash kind
    pub fn verify_commitment(&self, root: &Hash256, leaf: &Hash256) -> MerkleResult<bool> {
        verify::verify_commitment(root, leaf, self.leaf_index, self, self.hash_kind)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> MerkleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MerkleError::serialization(format!("JSON encode error: {}", e)))
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> MerkleResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MerkleError::deserialization(format!("JSON parse error: {}", e)))
    }
}

impl MerkleTree {
    /// Extract the inclusion proof for the leaf at `index`
    pub fn prove(&self, index: usize) -> MerkleResult<MerkleProof> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, leaf_count });
        }

        let mut steps = Vec::with_capacity(self.depth());
        let mut position = index;

        // Walk up the tree collecting siblings, skipping the root layer
        for layer in &self.layers()[..self.depth()] {
            if position >= layer.len() {
                return Err(MerkleError::malformed("tree layer shorter than path"));
            }
            let sibling = layer.get(position ^ 1).copied().unwrap_or(PADDING_NODE);
            steps.push(ProofStep {
                sibling,
                side: Side::of_sibling(position),
            });
            position /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index,
            hash_kind: self.hash_kind(),
            steps,
        })
    }

    /// Extract every proof in index order
    pub fn prove_all(&self) -> MerkleResult<Vec<MerkleProof>> {
        (0..self.leaf_count()).map(|i| self.prove(i)).collect()
    }
}
