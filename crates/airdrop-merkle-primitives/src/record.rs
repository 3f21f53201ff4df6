//! Airdrop records and their canonical encoding
//!
//! Every record field is normalized to a 256-bit big-endian word before it
//! is hashed, so `"16"`, `"0x10"`, `16u64` and `"0x0010"` are the same amount,
//! and `0xABC`/`abc` are the same address. The leaf encoding is the fixed
//! 96-byte concatenation `address || amount || data`.

use crate::error::PrimitiveError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of one normalized field in bytes
pub const WORD_LEN: usize = 32;

/// Length of the canonical leaf encoding in bytes
pub const LEAF_ENCODING_LEN: usize = 3 * WORD_LEN;

/// Maximum number of significant bits in a field
const MAX_BITS: u64 = 256;

/// A 256-bit unsigned integer stored as 32 big-endian bytes
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uint256([u8; WORD_LEN]);

impl Uint256 {
    /// Zero
    pub const ZERO: Self = Self([0u8; WORD_LEN]);

    /// Create from big-endian bytes
    pub const fn from_be_bytes(bytes: [u8; WORD_LEN]) -> Self {
        Self(bytes)
    }

    /// Big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; WORD_LEN] {
        self.0
    }

    /// Parse a decimal string, or a hex string with `0x` prefix
    pub fn parse(value: &str) -> Result<Self, PrimitiveError> {
        Self::parse_field("value", value)
    }

    /// Parse, naming `field` in any error
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, PrimitiveError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PrimitiveError::EmptyField { field });
        }
        match strip_hex_prefix(trimmed) {
            Some(digits) => parse_hex_digits(field, digits, value),
            None => {
                if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PrimitiveError::invalid_decimal(field, value));
                }
                let big = BigUint::parse_bytes(trimmed.as_bytes(), 10)
                    .ok_or_else(|| PrimitiveError::invalid_decimal(field, value))?;
                Self::from_biguint(field, &big)
            }
        }
    }

    /// Convert from an arbitrary-precision integer
    pub fn from_biguint(field: &'static str, value: &BigUint) -> Result<Self, PrimitiveError> {
        let bits = value.bits();
        if bits > MAX_BITS {
            return Err(PrimitiveError::Overflow { field, bits });
        }
        let be = value.to_bytes_be();
        let mut bytes = [0u8; WORD_LEN];
        bytes[WORD_LEN - be.len()..].copy_from_slice(&be);
        Ok(Self(bytes))
    }

    /// Convert to an arbitrary-precision integer
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// True if the value is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; WORD_LEN]
    }
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
}

fn parse_hex_digits(
    field: &'static str,
    digits: &str,
    original: &str,
) -> Result<Uint256, PrimitiveError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PrimitiveError::invalid_hex(field, original));
    }
    let big = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| PrimitiveError::invalid_hex(field, original))?;
    Uint256::from_biguint(field, &big)
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; WORD_LEN];
        bytes[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; WORD_LEN];
        bytes[WORD_LEN - 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl TryFrom<BigUint> for Uint256 {
    type Error = PrimitiveError;

    fn try_from(value: BigUint) -> Result<Self, Self::Error> {
        Self::from_biguint("value", &value)
    }
}

impl FromStr for Uint256 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({})", self)
    }
}

/// One record field as written in JSON: a string or an integer literal
///
/// Strings keep their per-field meaning (hex for addresses, decimal or `0x`
/// hex for amounts and data). Integers are values in every field, so `16`
/// is the address `0x10`. Integers that JSON cannot carry exactly (above
/// `u64::MAX`, negative, or fractional) are rejected with a hint to quote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A string spelling
    Text(String),
    /// An integer literal
    Number(u128),
}

impl FieldValue {
    /// Normalize as an amount or data word
    pub fn to_uint(&self, field: &'static str) -> Result<Uint256, PrimitiveError> {
        match self {
            FieldValue::Text(text) => Uint256::parse_field(field, text),
            FieldValue::Number(number) => Ok(Uint256::from(*number)),
        }
    }

    /// Normalize as an address
    pub fn to_address(&self) -> Result<Address, PrimitiveError> {
        match self {
            FieldValue::Text(text) => Address::parse(text),
            FieldValue::Number(number) => Ok(Address::from(Uint256::from(*number))),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

struct FieldValueVisitor;

impl serde::de::Visitor<'_> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a non-negative integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v.into()))
    }

    fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(|v| FieldValue::Number(v.into()))
            .map_err(|_| E::custom(format!("negative number {} is not a valid field", v)))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!(
            "number {} is not an exact integer up to {}; write large values as strings",
            v,
            u64::MAX
        )))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

impl Serialize for Uint256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldValue::deserialize(deserializer)?
            .to_uint("value")
            .map_err(serde::de::Error::custom)
    }
}

/// Fixed-width claimant identifier (hex, up to 32 bytes, left zero-padded)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(Uint256);

impl Address {
    /// Parse a hex address, with or without `0x` prefix
    pub fn parse(value: &str) -> Result<Self, PrimitiveError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PrimitiveError::EmptyField { field: "address" });
        }
        let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
        parse_hex_digits("address", digits, value).map(Self)
    }

    /// Create from big-endian bytes
    pub const fn from_be_bytes(bytes: [u8; WORD_LEN]) -> Self {
        Self(Uint256::from_be_bytes(bytes))
    }

    /// Big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; WORD_LEN] {
        self.0.to_be_bytes()
    }

    /// `0x` followed by 64 lowercase hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl From<Uint256> for Address {
    fn from(value: Uint256) -> Self {
        Self(value)
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldValue::deserialize(deserializer)?
            .to_address()
            .map_err(serde::de::Error::custom)
    }
}

/// One airdrop entry: who receives how much, plus an auxiliary tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Claimant address
    pub address: Address,
    /// Token amount (base units)
    pub amount: Uint256,
    /// Auxiliary data (vesting tag, tranche id, ...)
    pub data: Uint256,
}

impl Record {
    /// Create from already normalized fields
    pub fn new(address: Address, amount: impl Into<Uint256>, data: impl Into<Uint256>) -> Self {
        Self {
            address,
            amount: amount.into(),
            data: data.into(),
        }
    }

    /// Parse the three textual fields of an airdrop entry
    pub fn parse(address: &str, amount: &str, data: &str) -> Result<Self, PrimitiveError> {
        Ok(Self {
            address: Address::parse(address)?,
            amount: Uint256::parse_field("amount", amount)?,
            data: Uint256::parse_field("data", data)?,
        })
    }

    /// Normalize the three fields of an airdrop entry in either JSON spelling
    pub fn from_values(
        address: &FieldValue,
        amount: &FieldValue,
        data: &FieldValue,
    ) -> Result<Self, PrimitiveError> {
        Ok(Self {
            address: address.to_address()?,
            amount: amount.to_uint("amount")?,
            data: data.to_uint("data")?,
        })
    }

    /// Canonical 96-byte encoding: `address || amount || data`
    pub fn encode(&self) -> LeafEncoding {
        let mut bytes = [0u8; LEAF_ENCODING_LEN];
        bytes[..WORD_LEN].copy_from_slice(&self.address.to_be_bytes());
        bytes[WORD_LEN..2 * WORD_LEN].copy_from_slice(&self.amount.to_be_bytes());
        bytes[2 * WORD_LEN..].copy_from_slice(&self.data.to_be_bytes());
        LeafEncoding(bytes)
    }
}

/// The canonical byte form of a record, input to leaf hashing
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LeafEncoding([u8; LEAF_ENCODING_LEN]);

impl LeafEncoding {
    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; LEAF_ENCODING_LEN] {
        &self.0
    }
}

impl fmt::Debug for LeafEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeafEncoding(0x{})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_and_hex_amounts_agree() {
        let decimal = Uint256::parse("1000000000000000000").unwrap();
        let hex = Uint256::parse("0xde0b6b3a7640000").unwrap();
        let padded = Uint256::parse("0x00000de0b6b3a7640000").unwrap();
        let numeric = Uint256::from(1_000_000_000_000_000_000u64);
        assert_eq!(decimal, hex);
        assert_eq!(decimal, padded);
        assert_eq!(decimal, numeric);
        assert_eq!(decimal.to_string(), "1000000000000000000");
    }

    #[test]
    fn test_leading_zeros_and_whitespace() {
        assert_eq!(Uint256::parse(" 0042 ").unwrap(), Uint256::from(42u64));
    }

    #[test]
    fn test_invalid_decimal() {
        assert!(matches!(
            Uint256::parse("12a"),
            Err(PrimitiveError::InvalidDecimal { .. })
        ));
        assert!(matches!(
            Uint256::parse("-5"),
            Err(PrimitiveError::InvalidDecimal { .. })
        ));
        assert!(matches!(
            Uint256::parse("1_000"),
            Err(PrimitiveError::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn test_empty_field() {
        assert_eq!(
            Uint256::parse_field("amount", "  "),
            Err(PrimitiveError::EmptyField { field: "amount" })
        );
    }

    #[test]
    fn test_overflow() {
        let max = format!("0x{}", "f".repeat(64));
        assert!(Uint256::parse(&max).is_ok());
        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            Uint256::parse(&too_big),
            Err(PrimitiveError::Overflow { bits: 257, .. })
        ));
    }

    #[test]
    fn test_address_normalization() {
        let short = Address::parse("0x7e00d496e324876bbc8531f2d9a82bf154d1a04a50218ee74cdd372f75a551a")
            .unwrap();
        let upper = Address::parse("0X07E00D496E324876BBC8531F2D9A82BF154D1A04A50218EE74CDD372F75A551A")
            .unwrap();
        let bare = Address::parse("7e00d496e324876bbc8531f2d9a82bf154d1a04a50218ee74cdd372f75a551a")
            .unwrap();
        assert_eq!(short, upper);
        assert_eq!(short, bare);
        assert_eq!(
            short.to_hex(),
            "0x07e00d496e324876bbc8531f2d9a82bf154d1a04a50218ee74cdd372f75a551a"
        );
    }

    #[test]
    fn test_address_is_hex_only() {
        // "10" is hex for an address, decimal for an amount.
        let address = Address::parse("10").unwrap();
        assert_eq!(address.to_be_bytes()[31], 0x10);
        assert!(Address::parse("0xzz").is_err());
        assert!(Address::parse("0x").is_err());
    }

    #[test]
    fn test_encoding_layout() {
        let record = Record::parse("0xaa", "0x0102", "3").unwrap();
        let encoding = record.encode();
        let bytes = encoding.as_bytes();
        assert_eq!(bytes.len(), LEAF_ENCODING_LEN);
        assert_eq!(bytes[31], 0xaa);
        assert_eq!(&bytes[62..64], &[0x01, 0x02]);
        assert_eq!(bytes[95], 3);
        assert!(bytes[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_record_serde_accepts_numbers_and_strings() {
        let from_strings: Record = serde_json::from_str(
            r#"{"address":"0xbb","amount":"2000000000000000000","data":"0"}"#,
        )
        .unwrap();
        let from_numbers: Record = serde_json::from_str(
            r#"{"address":"0xBB","amount":2000000000000000000,"data":0}"#,
        )
        .unwrap();
        assert_eq!(from_strings, from_numbers);

        let json = serde_json::to_value(from_strings).unwrap();
        assert_eq!(json["amount"], "2000000000000000000");
        assert_eq!(json["address"], format!("0x{}bb", "0".repeat(62)));
    }

    #[test]
    fn test_numeric_address_is_a_value() {
        let numeric: Record =
            serde_json::from_str(r#"{"address":16,"amount":"1","data":"0"}"#).unwrap();
        assert_eq!(numeric.address, Address::parse("0x10").unwrap());

        let from_values = Record::from_values(&16u64.into(), &"1".into(), &0u64.into()).unwrap();
        assert_eq!(from_values, numeric);
    }

    #[test]
    fn test_oversized_number_has_clear_error() {
        let err = serde_json::from_str::<Record>(
            r#"{"address":"0xaa","amount":100000000000000000000,"data":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("write large values as strings"));

        let err = serde_json::from_str::<Uint256>("-3").unwrap_err();
        assert!(err.to_string().contains("negative"));

        let quoted: Uint256 = serde_json::from_str(r#""100000000000000000000""#).unwrap();
        assert_eq!(quoted, Uint256::from(100_000_000_000_000_000_000u128));
    }
}
