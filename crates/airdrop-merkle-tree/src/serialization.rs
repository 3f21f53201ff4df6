//! Tree persistence
//!
//! Trees are stored as self-describing JSON. The leaf commitments and every
//! internal layer are authoritative; the original records are optional
//! metadata that, when present, must re-encode to the stored leaves.
//!
//! ```json
//! {
//!   "format": "airdrop-merkle-v1",
//!   "hashKind": "rescue",
//!   "root": "0x...",
//!   "leafCount": 4,
//!   "layers": [["0x..", "0x..", "0x..", "0x.."], ["0x..", "0x.."], ["0x.."]],
//!   "values": [{ "address": "0x..", "amount": "..", "data": "..", "treeIndex": 0 }]
//! }
//! ```

use crate::error::{MerkleError, MerkleResult};
use crate::proof::MerkleProof;
use crate::tree::{next_layer, MerkleTree, PADDING_NODE};
use airdrop_merkle_primitives::{encode_leaf, Address, Hash256, HashKind, Record, Uint256};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// Format identifier written into every dump
pub const TREE_FORMAT: &str = "airdrop-merkle-v1";

/// Persisted form of a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDump {
    /// Format identifier
    pub format: String,
    /// Hash primitive of every node
    pub hash_kind: HashKind,
    /// Root hash
    pub root: Hash256,
    /// Number of leaves
    pub leaf_count: usize,
    /// All layers, leaves first
    pub layers: Vec<Vec<Hash256>>,
    /// Records behind the leaves (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<DumpValue>>,
}

/// A record together with its leaf position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpValue {
    /// Claimant address
    pub address: Address,
    /// Token amount
    pub amount: Uint256,
    /// Auxiliary data
    pub data: Uint256,
    /// Leaf index in the tree
    pub tree_index: usize,
}

impl DumpValue {
    /// The record this value describes
    pub fn record(&self) -> Record {
        Record {
            address: self.address,
            amount: self.amount,
            data: self.data,
        }
    }
}

impl MerkleTree {
    /// Capture the tree in its persisted form
    pub fn dump(&self) -> TreeDump {
        let values = self.records().map(|records| {
            records
                .iter()
                .enumerate()
                .map(|(tree_index, record)| DumpValue {
                    address: record.address,
                    amount: record.amount,
                    data: record.data,
                    tree_index,
                })
                .collect()
        });

        TreeDump {
            format: TREE_FORMAT.to_string(),
            hash_kind: self.hash_kind(),
            root: self.root(),
            leaf_count: self.leaf_count(),
            layers: self.layers().to_vec(),
            values,
        }
    }

    /// Restore a tree after structural validation
    ///
    /// Internal nodes are trusted as stored; use [`MerkleTree::load_verified`]
    /// to recompute them.
    pub fn load(dump: TreeDump) -> MerkleResult<Self> {
        validate_structure(&dump)?;
        let records = match &dump.values {
            Some(values) => Some(validate_values(values, &dump.layers[0], dump.hash_kind)?),
            None => None,
        };
        debug!(
            hash_kind = %dump.hash_kind,
            leaf_count = dump.leaf_count,
            has_records = records.is_some(),
            "loaded merkle tree"
        );
        Ok(Self::from_parts(dump.hash_kind, dump.layers, records))
    }

    /// Restore a tree and recompute every internal node
    pub fn load_verified(dump: TreeDump) -> MerkleResult<Self> {
        validate_structure(&dump)?;
        for (level, pair) in dump.layers.windows(2).enumerate() {
            if next_layer(&pair[0], dump.hash_kind, false) != pair[1] {
                return Err(MerkleError::deserialization(format!(
                    "layer {} does not hash to layer {}",
                    level,
                    level + 1
                )));
            }
        }
        Self::load(dump)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> MerkleResult<String> {
        serde_json::to_string_pretty(&self.dump())
            .map_err(|e| MerkleError::serialization(format!("JSON encode error: {}", e)))
    }

    /// Parse and validate a JSON dump
    pub fn from_json(json: &str) -> MerkleResult<Self> {
        let dump: TreeDump = serde_json::from_str(json)
            .map_err(|e| MerkleError::deserialization(format!("JSON parse error: {}", e)))?;
        Self::load(dump)
    }
}

fn validate_structure(dump: &TreeDump) -> MerkleResult<()> {
    if dump.format != TREE_FORMAT {
        return Err(MerkleError::deserialization(format!(
            "unsupported format '{}', expected '{}'",
            dump.format, TREE_FORMAT
        )));
    }

    let leaves = dump
        .layers
        .first()
        .ok_or_else(|| MerkleError::deserialization("tree has no layers"))?;
    if leaves.is_empty() {
        return Err(MerkleError::deserialization("tree has no leaves"));
    }
    if let Some(index) = leaves.iter().position(|leaf| *leaf == PADDING_NODE) {
        return Err(MerkleError::deserialization(format!(
            "leaf {} equals the reserved padding digest",
            index
        )));
    }
    if dump.leaf_count != leaves.len() {
        return Err(MerkleError::deserialization(format!(
            "leafCount is {} but layer 0 has {} nodes",
            dump.leaf_count,
            leaves.len()
        )));
    }

    for (level, pair) in dump.layers.windows(2).enumerate() {
        let (below, above) = (&pair[0], &pair[1]);
        if below.len() <= 1 || above.len() != below.len().div_ceil(2) {
            return Err(MerkleError::deserialization(format!(
                "layer {} has {} nodes, layer {} has {}",
                level + 1,
                above.len(),
                level,
                below.len()
            )));
        }
    }

    match dump.layers.last().map(Vec::as_slice) {
        Some([root]) if *root == dump.root => {}
        _ => {
            return Err(MerkleError::deserialization(
                "last layer does not consist of the stated root",
            ))
        }
    }

    let non_canonical = dump
        .layers
        .iter()
        .flatten()
        .find(|node| !dump.hash_kind.is_canonical(node));
    if let Some(node) = non_canonical {
        return Err(MerkleError::deserialization(format!(
            "{} is not a canonical {} digest",
            node, dump.hash_kind
        )));
    }

    Ok(())
}

fn validate_values(
    values: &[DumpValue],
    leaves: &[Hash256],
    hash_kind: HashKind,
) -> MerkleResult<Vec<Record>> {
    if values.len() != leaves.len() {
        return Err(MerkleError::deserialization(format!(
            "{} values for {} leaves",
            values.len(),
            leaves.len()
        )));
    }

    let mut records: Vec<Option<Record>> = vec![None; leaves.len()];
    for value in values {
        let slot = records.get_mut(value.tree_index).ok_or_else(|| {
            MerkleError::deserialization(format!("treeIndex {} out of range", value.tree_index))
        })?;
        if slot.is_some() {
            return Err(MerkleError::deserialization(format!(
                "treeIndex {} appears twice",
                value.tree_index
            )));
        }
        let record = value.record();
        if encode_leaf(&record, hash_kind) != leaves[value.tree_index] {
            return Err(MerkleError::deserialization(format!(
                "value at treeIndex {} does not match its leaf",
                value.tree_index
            )));
        }
        *slot = Some(record);
    }

    // Every slot is filled: counts match and no index repeats.
    Ok(records.into_iter().flatten().collect())
}

/// Write a tree as JSON
pub fn write_tree<W: Write>(writer: &mut W, tree: &MerkleTree) -> MerkleResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &tree.dump())
        .map_err(|e| MerkleError::serialization(format!("JSON encode error: {}", e)))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read and validate a tree from JSON
pub fn read_tree<R: Read>(reader: &mut R) -> MerkleResult<MerkleTree> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let dump: TreeDump = serde_json::from_slice(&data)
        .map_err(|e| MerkleError::deserialization(format!("JSON parse error: {}", e)))?;
    MerkleTree::load(dump)
}

/// Write a proof as JSON
pub fn write_proof<W: Write>(writer: &mut W, proof: &MerkleProof) -> MerkleResult<()> {
    serde_json::to_writer_pretty(&mut *writer, proof)
        .map_err(|e| MerkleError::serialization(format!("JSON encode error: {}", e)))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read a proof from JSON
pub fn read_proof<R: Read>(reader: &mut R) -> MerkleResult<MerkleProof> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    serde_json::from_slice(&data)
        .map_err(|e| MerkleError::deserialization(format!("JSON parse error: {}", e)))
}
