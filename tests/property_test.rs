//! Property-Based Tests for airdrop Merkle trees
//!
//! These tests use proptest to verify invariants that should hold for all inputs:
//! - Every generated proof verifies against the root
//! - Altering any record field invalidates the proof
//! - Dump/load round trips preserve every proof
//! - Layer widths and proof lengths follow the pairing rule
//! - Equivalent field spellings normalize to the same leaf

use airdrop_merkle::primitives::{encode_leaf, Address, HashKind, Record, Uint256};
use airdrop_merkle::tree::{verify, MerkleTree, TreeOptions};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn hash_kind() -> impl Strategy<Value = HashKind> {
    prop_oneof![
        Just(HashKind::Rescue),
        Just(HashKind::Sha256),
        Just(HashKind::Keccak256),
    ]
}

fn record() -> impl Strategy<Value = Record> {
    (any::<[u8; 32]>(), any::<u128>(), any::<u64>()).prop_map(|(address, amount, data)| {
        Record::new(Address::from_be_bytes(address), amount, data)
    })
}

fn records(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record(), 1..max)
}

// =============================================================================
// Inclusion
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every index of every tree verifies
    #[test]
    fn prop_every_proof_verifies(recs in records(40), kind in hash_kind()) {
        let tree = MerkleTree::from_records(&recs, kind).unwrap();
        let root = tree.root();
        for (i, record) in recs.iter().enumerate() {
            let proof = tree.prove(i).unwrap();
            prop_assert!(verify(&root, record, i, &proof, kind).unwrap());
        }
    }

    /// Flipping one bit of the amount invalidates the proof
    #[test]
    fn prop_amount_bit_flip_fails(
        recs in records(24),
        pick in any::<prop::sample::Index>(),
        bit in 0usize..256,
        kind in hash_kind(),
    ) {
        let tree = MerkleTree::from_records(&recs, kind).unwrap();
        let i = pick.index(recs.len());
        let proof = tree.prove(i).unwrap();

        let mut bytes = recs[i].amount.to_be_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        let mut forged = recs[i];
        forged.amount = Uint256::from_be_bytes(bytes);
        prop_assert!(!verify(&tree.root(), &forged, i, &proof, kind).unwrap());
    }

    /// Flipping one bit of the address invalidates the proof
    #[test]
    fn prop_address_bit_flip_fails(
        recs in records(24),
        pick in any::<prop::sample::Index>(),
        bit in 0usize..256,
        kind in hash_kind(),
    ) {
        let tree = MerkleTree::from_records(&recs, kind).unwrap();
        let i = pick.index(recs.len());
        let proof = tree.prove(i).unwrap();

        let mut bytes = recs[i].address.to_be_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        let mut forged = recs[i];
        forged.address = Address::from_be_bytes(bytes);
        prop_assert!(!verify(&tree.root(), &forged, i, &proof, kind).unwrap());
    }

    /// Changing the data field invalidates the proof
    #[test]
    fn prop_data_change_fails(
        recs in records(24),
        pick in any::<prop::sample::Index>(),
        delta in 1u64..,
        kind in hash_kind(),
    ) {
        let tree = MerkleTree::from_records(&recs, kind).unwrap();
        let i = pick.index(recs.len());
        let proof = tree.prove(i).unwrap();

        let mut bytes = recs[i].data.to_be_bytes();
        let low = u64::from_be_bytes(bytes[24..].try_into().unwrap());
        bytes[24..].copy_from_slice(&low.wrapping_add(delta).to_be_bytes());
        let mut forged = recs[i];
        forged.data = Uint256::from_be_bytes(bytes);
        prop_assert!(!verify(&tree.root(), &forged, i, &proof, kind).unwrap());
    }
}

// =============================================================================
// Structure
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Layer i+1 has ceil(len_i / 2) nodes; proofs have ceil(log2 n) steps
    #[test]
    fn prop_layer_widths_and_proof_length(recs in records(70)) {
        let tree = MerkleTree::from_records(&recs, HashKind::Sha256).unwrap();
        for pair in tree.layers().windows(2) {
            prop_assert_eq!(pair[1].len(), pair[0].len().div_ceil(2));
        }
        let n = recs.len();
        let expected = n.next_power_of_two().trailing_zeros() as usize;
        prop_assert_eq!(tree.depth(), expected);
        prop_assert_eq!(tree.prove(n - 1).unwrap().len(), expected);
    }

    /// Parallel construction is bit-identical to sequential
    #[test]
    fn prop_parallel_matches_sequential(recs in records(64), threshold in 2usize..16, kind in hash_kind()) {
        let sequential = MerkleTree::from_records_with_options(
            &recs,
            &TreeOptions::new(kind).sequential(),
        ).unwrap();
        let parallel = MerkleTree::from_records_with_options(
            &recs,
            &TreeOptions::new(kind).with_parallel_threshold(threshold),
        ).unwrap();
        prop_assert_eq!(sequential.layers(), parallel.layers());
    }
}

// =============================================================================
// Persistence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Reloaded trees produce identical proofs
    #[test]
    fn prop_dump_load_preserves_proofs(recs in records(30), kind in hash_kind()) {
        let tree = MerkleTree::from_records(&recs, kind).unwrap();
        let restored = MerkleTree::from_json(&tree.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored.root(), tree.root());
        prop_assert_eq!(restored.prove_all().unwrap(), tree.prove_all().unwrap());
    }
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Decimal, hex and numeric spellings of an amount give the same leaf
    #[test]
    fn prop_amount_spellings_agree(amount in any::<u64>(), zeros in 0usize..8, kind in hash_kind()) {
        let address = "0xabc";
        let decimal = Record::parse(address, &amount.to_string(), "0").unwrap();
        let hex = Record::parse(address, &format!("0x{}{:x}", "0".repeat(zeros), amount), "0").unwrap();
        let numeric = Record::new(Address::parse(address).unwrap(), amount, 0u64);
        prop_assert_eq!(encode_leaf(&decimal, kind), encode_leaf(&hex, kind));
        prop_assert_eq!(encode_leaf(&decimal, kind), encode_leaf(&numeric, kind));
    }

    /// Address case and prefix do not matter
    #[test]
    fn prop_address_spellings_agree(bytes in any::<[u8; 32]>(), kind in hash_kind()) {
        let lower = hex_string(&bytes);
        let a = Record::parse(&format!("0x{}", lower), "1", "0").unwrap();
        let b = Record::parse(&lower.to_uppercase(), "1", "0").unwrap();
        prop_assert_eq!(a.address.to_hex(), format!("0x{}", lower));
        prop_assert_eq!(encode_leaf(&a, kind), encode_leaf(&b, kind));
    }

    /// Amount display round trips through parsing
    #[test]
    fn prop_uint_display_roundtrip(bytes in any::<[u8; 32]>()) {
        let value = Uint256::from_be_bytes(bytes);
        prop_assert_eq!(Uint256::parse(&value.to_string()).unwrap(), value);
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
