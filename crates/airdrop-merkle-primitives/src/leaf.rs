//! Leaf commitments
//!
//! A leaf commitment is the hash of a record's canonical 96-byte encoding
//! under the selected primitive. See [`crate::primitive`] for the exact
//! per-primitive construction.

use crate::hash::Hash256;
use crate::primitive::HashKind;
use crate::record::Record;

/// Compute the leaf commitment of a single record
pub fn encode_leaf(record: &Record, kind: HashKind) -> Hash256 {
    kind.hash_leaf(&record.encode())
}

/// Compute leaf commitments for records, preserving input order
pub fn encode_leaves(records: &[Record], kind: HashKind) -> Vec<Hash256> {
    records.iter().map(|r| encode_leaf(r, kind)).collect()
}
