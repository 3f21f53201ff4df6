//! Per-claimant proof bundles
//!
//! A bundle is everything one claimant needs to submit a claim: their amount
//! and data, their leaf index, and the sibling path with sides. Bundles are
//! keyed by canonical address, so the serialized map is stable regardless of
//! input order.

use crate::error::{MerkleError, MerkleResult};
use crate::proof::{MerkleProof, ProofStep, Side};
use crate::tree::MerkleTree;
use crate::verify;
use airdrop_merkle_primitives::{Address, Hash256, HashKind, Record, Uint256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

/// Bundles keyed by claimant address
pub type ProofBundles = BTreeMap<Address, ProofBundle>;

/// A self-contained claim for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Sibling digests from leaf to root
    pub proof: Vec<Hash256>,
    /// Side of each sibling
    pub path: Vec<Side>,
    /// Claimable amount
    pub amount: Uint256,
    /// Auxiliary data
    pub data: Uint256,
    /// Leaf index
    pub index: usize,
}

impl ProofBundle {
    /// Assemble from a record and its proof
    pub fn new(record: &Record, proof: &MerkleProof) -> Self {
        Self {
            proof: proof.siblings(),
            path: proof.sides(),
            amount: record.amount,
            data: record.data,
            index: proof.leaf_index,
        }
    }

    /// Reconstruct the record for `address`
    pub fn record(&self, address: Address) -> Record {
        Record {
            address,
            amount: self.amount,
            data: self.data,
        }
    }

    /// Reconstruct the inclusion proof
    pub fn to_proof(&self, hash_kind: HashKind) -> MerkleResult<MerkleProof> {
        if self.proof.len() != self.path.len() {
            return Err(MerkleError::malformed(format!(
                "{} siblings but {} sides",
                self.proof.len(),
                self.path.len()
            )));
        }
        let steps = self
            .proof
            .iter()
            .zip(&self.path)
            .map(|(&sibling, &side)| ProofStep { sibling, side })
            .collect();
        Ok(MerkleProof {
            leaf_index: self.index,
            hash_kind,
            steps,
        })
    }

    /// Verify this bundle's claim for `address` against `root`
    pub fn verify(
        &self,
        root: &Hash256,
        address: Address,
        hash_kind: HashKind,
    ) -> MerkleResult<bool> {
        let proof = self.to_proof(hash_kind)?;
        verify::verify(root, &self.record(address), self.index, &proof, hash_kind)
    }
}

/// Build a bundle for every record in the tree
///
/// When an address occurs more than once, the first occurrence wins and the
/// rest are reported with a warning.
pub fn proof_bundles(tree: &MerkleTree) -> MerkleResult<ProofBundles> {
    let records = tree.records().ok_or(MerkleError::MissingRecords)?;
    let mut bundles = ProofBundles::new();

    for (index, record) in records.iter().enumerate() {
        match bundles.entry(record.address) {
            Entry::Occupied(existing) => {
                warn!(
                    address = %record.address,
                    index,
                    kept_index = existing.get().index,
                    "duplicate address, keeping first occurrence"
                );
            }
            Entry::Vacant(slot) => {
                let proof = tree.prove(index)?;
                slot.insert(ProofBundle::new(record, &proof));
            }
        }
    }

    debug!(bundles = bundles.len(), "generated proof bundles");
    Ok(bundles)
}
