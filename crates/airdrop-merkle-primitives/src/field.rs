//! Field arithmetic using Winterfell's BaseElement (Goldilocks 64-bit prime field)
//!
//! The Goldilocks field is defined by the prime p = 2^64 - 2^32 + 1.
//! Rescue digests live in this field; byte strings are lifted into it one
//! 32-bit limb at a time so the mapping stays injective.

use winter_math::fields::f64::BaseElement;
use winter_math::{FieldElement, StarkField};

/// The field element type used by the Rescue primitive
pub type Felt = BaseElement;

/// Zero in the field
pub const FELT_ZERO: Felt = BaseElement::ZERO;

/// One in the field
pub const FELT_ONE: Felt = BaseElement::ONE;

/// The Goldilocks prime: p = 2^64 - 2^32 + 1
pub const GOLDILOCKS_PRIME: u64 = 0xFFFFFFFF00000001;

/// Convert a u64 to a field element (reduces mod p)
#[inline]
pub fn felt_from_u64(value: u64) -> Felt {
    BaseElement::new(value % GOLDILOCKS_PRIME)
}

/// Convert a field element to u64 (canonical representative)
#[inline]
pub fn felt_to_u64(felt: Felt) -> u64 {
    felt.as_int()
}

/// Returns true if `value` is the canonical representative of a field element
#[inline]
pub fn is_canonical_u64(value: u64) -> bool {
    value < GOLDILOCKS_PRIME
}

/// Lift a byte string into field elements, one little-endian u32 limb each.
///
/// A trailing partial limb is zero-padded. Since every limb is below 2^32 the
/// lift never reduces and is injective for inputs of equal length.
pub fn felts_from_u32_limbs(bytes: &[u8]) -> Vec<Felt> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut limb = [0u8; 4];
            limb[..chunk.len()].copy_from_slice(chunk);
            felt_from_u64(u32::from_le_bytes(limb) as u64)
        })
        .collect()
}
