//! 32-byte digests shared by every hash primitive
//!
//! Byte-oriented primitives (SHA-256, Keccak-256) produce 32 bytes directly.
//! Rescue digests are four field elements, each written as a big-endian u64,
//! which also fills 32 bytes. Leaves, internal nodes and roots all use this
//! one representation regardless of the primitive that produced them.

use crate::field::{felt_from_u64, felt_to_u64, is_canonical_u64};
use crate::rescue::{RescueDigest, DIGEST_WIDTH};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Digest length in bytes
pub const HASH_LEN: usize = 32;

/// A 256-bit hash (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// Create a zero hash
    pub const fn zero() -> Self {
        Self([0u8; HASH_LEN])
    }

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string, with or without `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Encode a Rescue digest: each element as a big-endian u64
    pub fn from_felts(felts: &RescueDigest) -> Self {
        let mut bytes = [0u8; HASH_LEN];
        for (slot, felt) in bytes.chunks_exact_mut(8).zip(felts.iter()) {
            slot.copy_from_slice(&felt_to_u64(*felt).to_be_bytes());
        }
        Self(bytes)
    }

    /// Decode into four field elements. Non-canonical limbs are reduced mod p;
    /// use [`Hash256::is_canonical_felts`] to reject them first.
    pub fn to_felts(&self) -> RescueDigest {
        let limbs = self.u64_limbs();
        limbs.map(felt_from_u64)
    }

    /// True when every big-endian u64 limb is a canonical field element
    pub fn is_canonical_felts(&self) -> bool {
        self.u64_limbs().iter().all(|&limb| is_canonical_u64(limb))
    }

    fn u64_limbs(&self) -> [u64; DIGEST_WIDTH] {
        let mut limbs = [0u64; DIGEST_WIDTH];
        for (limb, chunk) in limbs.iter_mut().zip(self.0.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(word);
        }
        limbs
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256(0x{})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LEN]> for Hash256 {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GOLDILOCKS_PRIME;

    #[test]
    fn test_hash_from_hex() {
        let hex = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        let hash = Hash256::from_hex(hex).unwrap();
        assert_eq!(hash.to_hex(), hex);
    }

    #[test]
    fn test_hash_from_hex_with_prefix() {
        let hex = "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        let hash = Hash256::from_hex(hex).unwrap();
        assert_eq!(hash.to_prefixed_hex(), hex);
        assert_eq!(hash.to_string(), hex);
    }

    #[test]
    fn test_hash_from_hex_wrong_length() {
        assert!(Hash256::from_hex("0xabcd").is_err());
    }

    #[test]
    fn test_felts_roundtrip() {
        let felts = [1u64, 2, GOLDILOCKS_PRIME - 1, 1 << 40].map(felt_from_u64);
        let hash = Hash256::from_felts(&felts);
        assert!(hash.is_canonical_felts());
        assert_eq!(hash.to_felts(), felts);
    }

    #[test]
    fn test_non_canonical_limb_detected() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[..8].copy_from_slice(&GOLDILOCKS_PRIME.to_be_bytes());
        assert!(!Hash256(bytes).is_canonical_felts());
    }

    #[test]
    fn test_hash_serialization() {
        let hash = Hash256([7u8; HASH_LEN]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "07".repeat(32)));
        let recovered: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, recovered);
    }
}
