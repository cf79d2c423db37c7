//! Fixed-point formatting of smallest-unit amounts.

use num_bigint::BigUint;
use num_traits::{Num, Zero};

/// Formats `value` (in smallest units with `decimals` decimals) as a decimal
/// string with exactly `precision` fractional digits, rounding half up.
///
/// `precision` is capped at `decimals`.
pub fn format_units(value: &BigUint, decimals: u32, precision: u32) -> String {
    let precision = precision.min(decimals);
    let dropped = decimals - precision;

    let scaled = if dropped == 0 {
        value.clone()
    } else {
        let divisor = BigUint::from(10u32).pow(dropped);
        let half = &divisor / 2u32;
        (value + half) / divisor
    };

    let digits = scaled.to_string();
    if precision == 0 {
        return digits;
    }

    let width = precision as usize + 1;
    let padded = format!("{digits:0>width$}");
    let (integer, fraction) = padded.split_at(padded.len() - precision as usize);
    format!("{integer}.{fraction}")
}

/// Parses a `0x`-prefixed hex quantity as used by JSON-RPC.
pub fn parse_hex_quantity(raw: &str) -> Option<BigUint> {
    let hex = raw.trim().strip_prefix("0x")?;
    if hex.is_empty() {
        return Some(BigUint::zero());
    }
    BigUint::from_str_radix(hex, 16).ok()
}

/// Parses a base-10 quantity as used by block explorers.
pub fn parse_decimal_quantity(raw: &str) -> Option<BigUint> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    BigUint::from_str_radix(trimmed, 10).ok()
}
