//! Pluggable hash primitives behind one two-input compression interface
//!
//! Three primitives are available:
//! - `rescue`: Rescue-Prime over Goldilocks, cheap to verify inside an
//!   arithmetic circuit
//! - `sha256`: SHA-256
//! - `keccak256`: Keccak-256 (EVM compatible)
//!
//! Each implements [`HashPrimitive`]. [`HashKind`] is the runtime tag stored in
//! trees and proofs and dispatches to the matching implementation, so the
//! active primitive is always an explicit value rather than ambient state.
//!
//! Leaf hashing (fixed, part of the proof format):
//! - byte primitives: `H(0x00 || address || amount || data)`
//! - rescue: the 96-byte encoding is lifted into 24 field elements (u32 limbs)
//!   and absorbed as one input; the sponge's length binding separates it from
//!   the 8-element node input
//!
//! Node hashing is strictly positional: `compress(left, right)`.

use crate::error::PrimitiveError;
use crate::field::felts_from_u32_limbs;
use crate::hash::Hash256;
use crate::record::LeafEncoding;
use crate::rescue::{rescue_hash, rescue_merge};
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt;
use std::str::FromStr;

/// Domain tag prepended to leaf encodings by the byte-oriented primitives
pub const LEAF_DOMAIN_TAG: u8 = 0x00;

/// A two-input compression function plus leaf hashing
pub trait HashPrimitive {
    /// Tag identifying this primitive in trees and proofs
    const KIND: HashKind;

    /// Hash a canonical record encoding into a leaf commitment
    fn hash_leaf(encoding: &LeafEncoding) -> Hash256;

    /// Compress two child digests into their parent (left then right)
    fn compress(left: &Hash256, right: &Hash256) -> Hash256;

    /// Whether `digest` could have been produced by this primitive
    fn is_canonical(_digest: &Hash256) -> bool {
        true
    }
}

/// Rescue-Prime over the Goldilocks field
#[derive(Debug, Clone, Copy, Default)]
pub struct RescuePrimitive;

impl HashPrimitive for RescuePrimitive {
    const KIND: HashKind = HashKind::Rescue;

    fn hash_leaf(encoding: &LeafEncoding) -> Hash256 {
        let felts = felts_from_u32_limbs(encoding.as_bytes());
        Hash256::from_felts(&rescue_hash(&felts))
    }

    fn compress(left: &Hash256, right: &Hash256) -> Hash256 {
        Hash256::from_felts(&rescue_merge(&left.to_felts(), &right.to_felts()))
    }

    fn is_canonical(digest: &Hash256) -> bool {
        digest.is_canonical_felts()
    }
}

/// SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Primitive;

impl HashPrimitive for Sha256Primitive {
    const KIND: HashKind = HashKind::Sha256;

    fn hash_leaf(encoding: &LeafEncoding) -> Hash256 {
        byte_leaf::<sha2::Sha256>(encoding)
    }

    fn compress(left: &Hash256, right: &Hash256) -> Hash256 {
        byte_compress::<sha2::Sha256>(left, right)
    }
}

/// Keccak-256 (the pre-standard SHA-3 padding used by the EVM)
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Primitive;

impl HashPrimitive for Keccak256Primitive {
    const KIND: HashKind = HashKind::Keccak256;

    fn hash_leaf(encoding: &LeafEncoding) -> Hash256 {
        byte_leaf::<sha3::Keccak256>(encoding)
    }

    fn compress(left: &Hash256, right: &Hash256) -> Hash256 {
        byte_compress::<sha3::Keccak256>(left, right)
    }
}

fn byte_leaf<D: Digest>(encoding: &LeafEncoding) -> Hash256 {
    let digest = D::new()
        .chain_update([LEAF_DOMAIN_TAG])
        .chain_update(encoding.as_bytes())
        .finalize();
    to_hash256(digest.as_slice())
}

fn byte_compress<D: Digest>(left: &Hash256, right: &Hash256) -> Hash256 {
    let digest = D::new()
        .chain_update(left.as_bytes())
        .chain_update(right.as_bytes())
        .finalize();
    to_hash256(digest.as_slice())
}

fn to_hash256(digest: &[u8]) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(digest);
    Hash256(bytes)
}

/// Runtime tag selecting a hash primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// Rescue-Prime (arithmetic-friendly)
    #[default]
    Rescue,
    /// SHA-256
    Sha256,
    /// Keccak-256
    Keccak256,
}

impl HashKind {
    /// All supported kinds
    pub const ALL: [HashKind; 3] = [HashKind::Rescue, HashKind::Sha256, HashKind::Keccak256];

    /// Stable identifier written into persisted trees and proofs
    pub fn tag(&self) -> &'static str {
        match self {
            HashKind::Rescue => "rescue",
            HashKind::Sha256 => "sha256",
            HashKind::Keccak256 => "keccak256",
        }
    }

    /// Hash a canonical record encoding into a leaf commitment
    pub fn hash_leaf(&self, encoding: &LeafEncoding) -> Hash256 {
        match self {
            HashKind::Rescue => RescuePrimitive::hash_leaf(encoding),
            HashKind::Sha256 => Sha256Primitive::hash_leaf(encoding),
            HashKind::Keccak256 => Keccak256Primitive::hash_leaf(encoding),
        }
    }

    /// Compress two child digests into their parent
    pub fn compress(&self, left: &Hash256, right: &Hash256) -> Hash256 {
        match self {
            HashKind::Rescue => RescuePrimitive::compress(left, right),
            HashKind::Sha256 => Sha256Primitive::compress(left, right),
            HashKind::Keccak256 => Keccak256Primitive::compress(left, right),
        }
    }

    /// Whether `digest` is a valid output of this primitive
    pub fn is_canonical(&self, digest: &Hash256) -> bool {
        match self {
            HashKind::Rescue => RescuePrimitive::is_canonical(digest),
            HashKind::Sha256 => Sha256Primitive::is_canonical(digest),
            HashKind::Keccak256 => Keccak256Primitive::is_canonical(digest),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HashKind {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        HashKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == lowered)
            .ok_or_else(|| PrimitiveError::UnknownHashKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn sample_encoding() -> LeafEncoding {
        Record::parse("0xaa", "1000", "0").unwrap().encode()
    }

    #[test]
    fn test_tags_roundtrip() {
        for kind in HashKind::ALL {
            assert_eq!(kind.tag().parse::<HashKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.tag()));
        }
        assert_eq!("SHA256".parse::<HashKind>().unwrap(), HashKind::Sha256);
        assert!(matches!(
            "pedersen".parse::<HashKind>(),
            Err(PrimitiveError::UnknownHashKind(_))
        ));
    }

    #[test]
    fn test_primitives_disagree() {
        let encoding = sample_encoding();
        let rescue = HashKind::Rescue.hash_leaf(&encoding);
        let sha = HashKind::Sha256.hash_leaf(&encoding);
        let keccak = HashKind::Keccak256.hash_leaf(&encoding);
        assert_ne!(rescue, sha);
        assert_ne!(sha, keccak);
        assert_ne!(rescue, keccak);
    }

    #[test]
    fn test_compress_is_positional() {
        let a = Hash256([1u8; 32]);
        let b = Hash256([2u8; 32]);
        for kind in HashKind::ALL {
            assert_eq!(kind.compress(&a, &b), kind.compress(&a, &b));
            assert_ne!(kind.compress(&a, &b), kind.compress(&b, &a));
        }
    }

    #[test]
    fn test_leaf_is_domain_separated_from_node() {
        // A leaf hash never equals hashing the encoding's halves as a node.
        let encoding = sample_encoding();
        let bytes = encoding.as_bytes();
        let mut left = [0u8; 32];
        let mut right = [0u8; 32];
        left.copy_from_slice(&bytes[32..64]);
        right.copy_from_slice(&bytes[64..96]);
        for kind in HashKind::ALL {
            assert_ne!(
                kind.hash_leaf(&encoding),
                kind.compress(&Hash256(left), &Hash256(right))
            );
        }
    }

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256 of 64 zero bytes
        let node = Sha256Primitive::compress(&Hash256::zero(), &Hash256::zero());
        assert_eq!(
            node.to_hex(),
            "f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b"
        );
    }

    #[test]
    fn test_rescue_outputs_are_canonical() {
        let leaf = HashKind::Rescue.hash_leaf(&sample_encoding());
        assert!(HashKind::Rescue.is_canonical(&leaf));
        let node = HashKind::Rescue.compress(&leaf, &leaf);
        assert!(HashKind::Rescue.is_canonical(&node));
        assert!(!HashKind::Rescue.is_canonical(&Hash256([0xff; 32])));
        assert!(HashKind::Sha256.is_canonical(&Hash256([0xff; 32])));
    }
}
