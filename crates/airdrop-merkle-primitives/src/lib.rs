//! Airdrop Merkle Primitives
//!
//! This crate provides the building blocks shared by tree construction and
//! claim verification:
//! - Field arithmetic using Winterfell's BaseElement (64-bit Goldilocks prime field)
//! - Rescue-Prime hash function (arithmetic-friendly)
//! - SHA-256 and Keccak-256 byte-oriented hashing
//! - A uniform two-input compression interface over all three primitives
//! - Canonical normalization and encoding of airdrop records

pub mod error;
pub mod field;
pub mod hash;
pub mod leaf;
pub mod primitive;
pub mod record;
pub mod rescue;

pub use error::PrimitiveError;
pub use field::{felt_from_u64, felt_to_u64, Felt, FELT_ONE, FELT_ZERO, GOLDILOCKS_PRIME};
pub use hash::Hash256;
pub use leaf::{encode_leaf, encode_leaves};
pub use primitive::{
    HashKind, HashPrimitive, Keccak256Primitive, RescuePrimitive, Sha256Primitive,
    LEAF_DOMAIN_TAG,
};
pub use record::{Address, FieldValue, LeafEncoding, Record, Uint256, LEAF_ENCODING_LEN};
pub use rescue::{rescue_hash, rescue_merge, RescueDigest};
