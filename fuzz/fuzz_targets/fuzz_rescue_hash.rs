//! Fuzz target for the Rescue-Prime primitive
//!
//! This target ensures the hash function:
//! 1. Never panics on any input
//! 2. Produces deterministic output
//! 3. Always produces canonical digests

#![no_main]

use airdrop_merkle_primitives::rescue::{rescue_hash, rescue_merge};
use airdrop_merkle_primitives::{felt_from_u64, Felt, Hash256, HashKind};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzInput {
    /// Field elements to absorb (as u64 values)
    Hash(Vec<u64>),
    /// Two digests given as limbs
    Merge { left: [u64; 4], right: [u64; 4] },
    /// Two raw 32-byte digests
    Compress { left: [u8; 32], right: [u8; 32] },
}

fuzz_target!(|input: FuzzInput| {
    match input {
        FuzzInput::Hash(values) => {
            // Limit input size to avoid OOM
            let felts: Vec<Felt> = values.iter().take(100).map(|&v| felt_from_u64(v)).collect();
            let digest = rescue_hash(&felts);
            assert_eq!(digest, rescue_hash(&felts));
            assert!(Hash256::from_felts(&digest).is_canonical_felts());
        }
        FuzzInput::Merge { left, right } => {
            let left = left.map(felt_from_u64);
            let right = right.map(felt_from_u64);
            let digest = rescue_merge(&left, &right);
            assert_eq!(digest, rescue_merge(&left, &right));
        }
        FuzzInput::Compress { left, right } => {
            // Non-canonical inputs are reduced, never rejected with a panic
            let node = HashKind::Rescue.compress(&Hash256(left), &Hash256(right));
            assert!(HashKind::Rescue.is_canonical(&node));
        }
    }
});
