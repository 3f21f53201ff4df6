//! Error types for tree construction, proofs and persistence

use airdrop_merkle_primitives::{HashKind, PrimitiveError};
use thiserror::Error;

/// Errors that can occur while building, proving, verifying or loading trees
#[derive(Debug, Error)]
pub enum MerkleError {
    /// No records or leaves were supplied
    #[error("Cannot build a Merkle tree from zero leaves")]
    EmptyInput,

    /// A leaf equals the digest reserved for padding odd layers
    #[error("Leaf {index} equals the reserved padding digest")]
    ReservedLeaf { index: usize },

    /// Requested leaf index does not exist
    #[error("Leaf index {index} out of range (leaf count: {leaf_count})")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    /// Proof is structurally invalid for the claimed index
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Proof was produced with a different hash primitive
    #[error("Hash kind mismatch: expected {expected}, proof uses {actual}")]
    HashKindMismatch { expected: HashKind, actual: HashKind },

    /// Persisted tree or proof is invalid
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Tree or proof could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Operation needs the original records but the tree only holds commitments
    #[error("Tree carries no records (built from pre-hashed leaves)")]
    MissingRecords,

    /// A record field or hash kind tag failed to parse
    #[error(transparent)]
    InvalidInput(#[from] PrimitiveError),

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MerkleError {
    /// Create a malformed proof error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedProof(message.into())
    }

    /// Create a deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

/// Result type for Merkle operations
pub type MerkleResult<T> = Result<T, MerkleError>;
