//! Fuzz target for claim verification
//!
//! This target ensures:
//! 1. Verification never panics on arbitrary proofs
//! 2. A proof only verifies a record at the index it occupies in the tree

#![no_main]

use airdrop_merkle_primitives::{Address, Hash256, HashKind, Record, Uint256};
use airdrop_merkle_tree::{verify, MerkleProof, MerkleTree, ProofStep, Side};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

#[derive(Debug, Arbitrary)]
struct FuzzProof {
    kind: u8,
    index: usize,
    proof_index: usize,
    steps: Vec<([u8; 32], bool)>,
    address: [u8; 32],
    amount: u64,
}

fn kind_of(tag: u8) -> HashKind {
    HashKind::ALL[tag as usize % HashKind::ALL.len()]
}

fn trees() -> &'static [MerkleTree] {
    static TREES: OnceLock<Vec<MerkleTree>> = OnceLock::new();
    TREES.get_or_init(|| {
        let records: Vec<Record> = (1..=7u64)
            .map(|i| Record::new(Uint256::from(i).into(), i * 100, 0u64))
            .collect();
        HashKind::ALL
            .iter()
            .map(|&kind| MerkleTree::from_records(&records, kind).unwrap())
            .collect()
    })
}

fuzz_target!(|input: FuzzProof| {
    let kind = kind_of(input.kind);
    let tree = &trees()[input.kind as usize % HashKind::ALL.len()];
    let proof = MerkleProof {
        leaf_index: input.proof_index,
        hash_kind: kind,
        steps: input
            .steps
            .iter()
            .take(80)
            .map(|&(sibling, left)| ProofStep {
                sibling: Hash256(sibling),
                side: if left { Side::Left } else { Side::Right },
            })
            .collect(),
    };

    // Addresses 1..=7 sit at indices 0..7; an odd leaf count leaves index 7 empty.
    let address = Address::from_be_bytes(input.address);
    let record = Record::new(address, input.amount, 0u64);
    let at_index = tree
        .records()
        .and_then(|records| records.get(input.index))
        .is_some_and(|stored| *stored == record);

    if let Ok(true) = verify(&tree.root(), &record, input.index, &proof, kind) {
        assert!(
            input.index < tree.leaf_count() && at_index,
            "proof verified a record away from its leaf index"
        );
    }
});
