//! Claim verification
//!
//! Verification needs nothing but the published root, the claimed record, its
//! index and the proof. The proof's structure is checked against the index
//! before any hashing:
//!
//! - the verifier's hash kind must match the proof's
//! - the proof must be for the claimed index
//! - at most [`MAX_PROOF_DEPTH`] steps, and the index must fit in that many bits
//! - every step's side must agree with the corresponding bit of the index
//! - every sibling must be a canonical digest for the hash kind
//! - the padding digest may only appear as a right sibling
//!
//! A structurally valid proof that does not reproduce the root yields
//! `Ok(false)`, as does a claimed leaf equal to the padding digest.
//! Structural problems are errors.

use crate::error::{MerkleError, MerkleResult};
use crate::proof::{MerkleProof, Side};
use crate::tree::PADDING_NODE;
use airdrop_merkle_primitives::{encode_leaf, Hash256, HashKind, Record};

/// Longest accepted proof
pub const MAX_PROOF_DEPTH: usize = 63;

/// Verify that `record` sits at `index` in the tree committed to by `root`
pub fn verify(
    root: &Hash256,
    record: &Record,
    index: usize,
    proof: &MerkleProof,
    hash_kind: HashKind,
) -> MerkleResult<bool> {
    check_hash_kind(proof, hash_kind)?;
    let leaf = encode_leaf(record, hash_kind);
    verify_commitment(root, &leaf, index, proof, hash_kind)
}

/// Verify a pre-computed leaf commitment instead of a record
pub fn verify_commitment(
    root: &Hash256,
    leaf: &Hash256,
    index: usize,
    proof: &MerkleProof,
    hash_kind: HashKind,
) -> MerkleResult<bool> {
    check_hash_kind(proof, hash_kind)?;
    check_structure(proof, index, hash_kind)?;
    if *leaf == PADDING_NODE {
        return Ok(false);
    }

    let computed = proof.steps.iter().fold(*leaf, |acc, step| match step.side {
        Side::Left => hash_kind.compress(&step.sibling, &acc),
        Side::Right => hash_kind.compress(&acc, &step.sibling),
    });

    Ok(computed == *root)
}

fn check_hash_kind(proof: &MerkleProof, expected: HashKind) -> MerkleResult<()> {
    if proof.hash_kind != expected {
        return Err(MerkleError::HashKindMismatch {
            expected,
            actual: proof.hash_kind,
        });
    }
    Ok(())
}

fn check_structure(proof: &MerkleProof, index: usize, hash_kind: HashKind) -> MerkleResult<()> {
    if proof.leaf_index != index {
        return Err(MerkleError::malformed(format!(
            "proof is for index {}, claim is for index {}",
            proof.leaf_index, index
        )));
    }

    let depth = proof.steps.len();
    if depth > MAX_PROOF_DEPTH {
        return Err(MerkleError::malformed(format!(
            "proof has {} steps, at most {} allowed",
            depth, MAX_PROOF_DEPTH
        )));
    }

    let index = index as u64;
    if index >> depth != 0 {
        return Err(MerkleError::malformed(format!(
            "index {} does not fit in a tree of depth {}",
            index, depth
        )));
    }

    for (level, step) in proof.steps.iter().enumerate() {
        let expected = if (index >> level) & 1 == 0 {
            Side::Right
        } else {
            Side::Left
        };
        if step.side != expected {
            return Err(MerkleError::malformed(format!(
                "step {} has sibling on the {:?} side, index {} requires {:?}",
                level, step.side, index, expected
            )));
        }
        if step.side == Side::Left && step.sibling == PADDING_NODE {
            return Err(MerkleError::malformed(format!(
                "step {} has the padding digest as a left sibling",
                level
            )));
        }
        if !hash_kind.is_canonical(&step.sibling) {
            return Err(MerkleError::malformed(format!(
                "step {} sibling {} is not a canonical {} digest",
                level, step.sibling, hash_kind
            )));
        }
    }

    Ok(())
}

/// Verifier bound to one published root and hash primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimVerifier {
    root: Hash256,
    hash_kind: HashKind,
}

impl ClaimVerifier {
    /// Create a verifier for `root`
    pub fn new(root: Hash256, hash_kind: HashKind) -> Self {
        Self { root, hash_kind }
    }

    /// The root claims are checked against
    pub fn root(&self) -> Hash256 {
        self.root
    }

    /// The expected hash primitive
    pub fn hash_kind(&self) -> HashKind {
        self.hash_kind
    }

    /// Verify a claim
    pub fn verify(&self, record: &Record, index: usize, proof: &MerkleProof) -> MerkleResult<bool> {
        verify(&self.root, record, index, proof, self.hash_kind)
    }

    /// Verify a claim, treating every failure as invalid
    pub fn is_valid(&self, record: &Record, index: usize, proof: &MerkleProof) -> bool {
        self.verify(record, index, proof).unwrap_or(false)
    }
}
