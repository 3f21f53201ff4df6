//! Airdrop Merkle - commitments and inclusion proofs for token airdrops
//!
//! This crate builds a Merkle tree over `(address, amount, data)` airdrop
//! records and produces per-record inclusion proofs that a claimant can
//! present against the published root.
//!
//! # Overview
//!
//! Records are normalized to a fixed 96-byte encoding and hashed into leaves
//! with one of three interchangeable primitives (Rescue-Prime, SHA-256,
//! Keccak-256). The tree, its proofs and per-address proof bundles are plain
//! serde types, so they can be persisted and reloaded without recomputation.
//!
//! # Crates
//!
//! - `airdrop-merkle-primitives`: Field arithmetic, hash primitives, record encoding
//! - `airdrop-merkle-tree`: Tree construction, proofs, verification, persistence
//!
//! # Example
//!
//! ```
//! use airdrop_merkle::primitives::{HashKind, Record};
//! use airdrop_merkle::tree::MerkleTree;
//!
//! let records = vec![
//!     Record::parse("0xaa", "1000000000000000000", "0").unwrap(),
//!     Record::parse("0xbb", "2000000000000000000", "0").unwrap(),
//! ];
//! let tree = MerkleTree::from_records(&records, HashKind::Rescue).unwrap();
//! let proof = tree.prove(1).unwrap();
//! assert!(proof.verify(&tree.root(), &records[1]).unwrap());
//! ```

// Re-export sub-crates
pub use airdrop_merkle_primitives as primitives;
pub use airdrop_merkle_tree as tree;

pub use airdrop_merkle_primitives::{Address, Hash256, HashKind, Record, Uint256};
pub use airdrop_merkle_tree::{
    proof_bundles, verify, ClaimVerifier, MerkleError, MerkleProof, MerkleResult, MerkleTree,
    ProofBundle, TreeOptions,
};
