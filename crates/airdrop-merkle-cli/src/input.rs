//! Airdrop list parsing
//!
//! The input file is a JSON array. Each entry is either a positional triple
//! `[address, amount, data]` or an object `{ "address", "amount", "data" }`.
//! Amounts and data may be decimal strings, `0x` hex strings or plain numbers.
//! A string address is hex; a numeric address is taken by value in both forms.

use airdrop_merkle_primitives::{FieldValue, Record};
use anyhow::{Context, Result};
use serde_json::Value;

/// Records from the original airdrop script, used by `sample`
pub const SAMPLE_AIRDROP: [[&str; 3]; 4] = [
    [
        "0x7e00d496e324876bbc8531f2d9a82bf154d1a04a50218ee74cdd372f75a551a",
        "1000000000000000000",
        "0",
    ],
    [
        "0x53c615080d35defd55569488bc48c1a91d82f2d2ce6199463e095b4a4ead551",
        "2000000000000000000",
        "0",
    ],
    [
        "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        "500000000000000000",
        "1",
    ],
    [
        "0x5678901234567890abcdef1234567890abcdef1234567890abcdef1234567890",
        "750000000000000000",
        "0",
    ],
];

/// Parse an airdrop list
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let entries: Vec<Value> =
        serde_json::from_str(json).context("airdrop list must be a JSON array")?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, value)| parse_entry(value).with_context(|| format!("entry {}", i)))
        .collect()
}

fn parse_entry(value: Value) -> Result<Record> {
    match value {
        Value::Array(_) => {
            let (address, amount, data): (FieldValue, FieldValue, FieldValue) =
                serde_json::from_value(value).context("expected [address, amount, data]")?;
            Ok(Record::from_values(&address, &amount, &data)?)
        }
        Value::Object(_) => {
            Ok(serde_json::from_value(value).context("expected {address, amount, data}")?)
        }
        other => anyhow::bail!("expected [address, amount, data] or an object, found {}", other),
    }
}

/// The sample airdrop as a JSON array of triples
pub fn sample_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&SAMPLE_AIRDROP)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdrop_merkle_primitives::{Address, Uint256};

    #[test]
    fn sample_parses() {
        let records = parse_records(&sample_json().unwrap()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].data, Uint256::from(1u64));
    }

    #[test]
    fn triples_and_objects_mix() {
        let json = r#"[
            ["0xaa", 1000, "0x0"],
            {"address": "bb", "amount": "2000", "data": 0}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].amount, Uint256::from(1000u64));
        assert_eq!(records[1].address, Address::parse("0xbb").unwrap());
    }

    #[test]
    fn bad_entry_reports_index() {
        let json = r#"[["0xaa", "1", "0"], ["0xbb", "12x", "0"]]"#;
        let err = parse_records(json).unwrap_err();
        assert!(format!("{:#}", err).contains("entry 1"));
    }

    #[test]
    fn numeric_address_agrees_across_forms() {
        let triple = parse_records(r#"[[16, "1", "0"]]"#).unwrap();
        let object = parse_records(r#"[{"address": 16, "amount": "1", "data": "0"}]"#).unwrap();
        let hex = parse_records(r#"[["0x10", "1", "0"]]"#).unwrap();
        assert_eq!(triple[0].address, Address::parse("0x10").unwrap());
        assert_eq!(triple, object);
        assert_eq!(triple, hex);
    }

    #[test]
    fn oversized_number_names_entry() {
        let json = r#"[["0xaa", 100000000000000000000, "0"]]"#;
        let err = format!("{:#}", parse_records(json).unwrap_err());
        assert!(err.contains("entry 0"));
        assert!(err.contains("write large values as strings"));
    }

    #[test]
    fn scalar_entry_rejected() {
        let err = format!("{:#}", parse_records(r#"["0xaa"]"#).unwrap_err());
        assert!(err.contains("entry 0"));
    }

    #[test]
    fn non_array_rejected() {
        assert!(parse_records(r#"{"address": "0xaa"}"#).is_err());
    }
}
