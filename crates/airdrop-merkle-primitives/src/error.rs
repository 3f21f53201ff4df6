//! Error types for record parsing and hash selection

use thiserror::Error;

/// Errors raised while normalizing record fields or selecting a hash primitive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// A record field was empty or whitespace only
    #[error("Field '{field}' is empty")]
    EmptyField { field: &'static str },

    /// A hex-encoded value contained non-hex characters
    #[error("Invalid hex in {field}: '{value}'")]
    InvalidHex { field: &'static str, value: String },

    /// A decimal value contained non-digit characters
    #[error("Invalid decimal in {field}: '{value}'")]
    InvalidDecimal { field: &'static str, value: String },

    /// The value does not fit in 256 bits
    #[error("Value of {field} needs {bits} bits, at most 256 are allowed")]
    Overflow { field: &'static str, bits: u64 },

    /// Unknown hash kind tag
    #[error("Unknown hash kind '{0}' (expected one of: rescue, sha256, keccak256)")]
    UnknownHashKind(String),
}

impl PrimitiveError {
    /// Create an invalid hex error
    pub fn invalid_hex(field: &'static str, value: &str) -> Self {
        Self::InvalidHex {
            field,
            value: value.to_string(),
        }
    }

    /// Create an invalid decimal error
    pub fn invalid_decimal(field: &'static str, value: &str) -> Self {
        Self::InvalidDecimal {
            field,
            value: value.to_string(),
        }
    }
}
