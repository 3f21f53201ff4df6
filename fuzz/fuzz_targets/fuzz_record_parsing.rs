//! Fuzz target for record normalization
//!
//! This target ensures:
//! 1. Parsing never panics on arbitrary strings
//! 2. Parsed values survive a display/parse round trip
//! 3. Normalized records encode to exactly 96 bytes

#![no_main]

use airdrop_merkle_primitives::{Address, Record, Uint256, LEAF_ENCODING_LEN};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct RecordInput {
    address: String,
    amount: String,
    data: String,
}

fuzz_target!(|input: RecordInput| {
    if let Ok(amount) = Uint256::parse(&input.amount) {
        assert_eq!(Uint256::parse(&amount.to_string()).unwrap(), amount);
    }
    if let Ok(address) = Address::parse(&input.address) {
        assert_eq!(Address::parse(&address.to_hex()).unwrap(), address);
    }
    if let Ok(record) = Record::parse(&input.address, &input.amount, &input.data) {
        assert_eq!(record.encode().as_bytes().len(), LEAF_ENCODING_LEN);
    }
});
