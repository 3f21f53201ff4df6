//! Airdrop Merkle Tree
//!
//! Commits to a fixed list of airdrop records with a binary Merkle tree and
//! produces per-record inclusion proofs that can be checked against the root
//! alone.
//!
//! ## Components
//!
//! - [`MerkleTree`]: layers from leaf commitments up to the root
//! - [`MerkleProof`]: sibling path with explicit sides
//! - [`verify()`]: stateless claim verification
//! - [`TreeDump`]: self-describing JSON persistence
//! - [`proof_bundles`]: per-address claim objects

pub mod bundle;
pub mod config;
pub mod error;
pub mod proof;
pub mod serialization;
pub mod tree;
pub mod verify;

pub use bundle::{proof_bundles, ProofBundle, ProofBundles};
pub use config::{TreeOptions, DEFAULT_PARALLEL_THRESHOLD};
pub use error::{MerkleError, MerkleResult};
pub use proof::{MerkleProof, ProofStep, Side};
pub use serialization::{
    read_proof, read_tree, write_proof, write_tree, DumpValue, TreeDump, TREE_FORMAT,
};
pub use tree::{build_layers, next_layer, MerkleTree, PADDING_NODE};
pub use verify::{verify, verify_commitment, ClaimVerifier, MAX_PROOF_DEPTH};
