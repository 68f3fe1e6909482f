//! Fixed-point encoding for ledger amounts
//!
//! Amounts cross the ledger boundary as integers scaled by 10^18. The public
//! API always uses human-readable decimal strings; conversion happens at the
//! gateway boundary only, in pure integer arithmetic so no precision is lost.

use crate::error::{RegistryError, Result};

/// Decimal places in the ledger's native numeric convention
pub const FIXED_POINT_DECIMALS: u32 = 18;

const SCALE: u128 = 10u128.pow(FIXED_POINT_DECIMALS);

/// Encode a non-negative decimal string into the ledger's fixed-point form.
///
/// Rejects negatives, signs, malformed digits, more than 18 fractional
/// digits, and magnitudes that overflow the ledger's integer width.
pub fn encode_fixed_point(decimal: &str) -> Result<u128> {
    let s = decimal.trim();
    if s.is_empty() {
        return Err(RegistryError::InvalidInput("empty amount".into()));
    }
    if s.starts_with('-') || s.starts_with('+') {
        return Err(RegistryError::InvalidInput(format!(
            "amount must be an unsigned decimal, got {s:?}"
        )));
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(RegistryError::InvalidInput(format!("malformed amount {s:?}")));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(RegistryError::InvalidInput(format!("malformed amount {s:?}")));
    }
    if frac_part.len() as u32 > FIXED_POINT_DECIMALS {
        return Err(RegistryError::InvalidInput(format!(
            "amount {s:?} exceeds {FIXED_POINT_DECIMALS} decimal places"
        )));
    }

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| RegistryError::InvalidInput(format!("amount {s:?} out of range")))?
    };
    let frac_value: u128 = if frac_part.is_empty() {
        0
    } else {
        let parsed: u128 = frac_part.parse().map_err(|_| {
            RegistryError::InvalidInput(format!("amount {s:?} out of range"))
        })?;
        parsed * 10u128.pow(FIXED_POINT_DECIMALS - frac_part.len() as u32)
    };

    int_value
        .checked_mul(SCALE)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| RegistryError::InvalidInput(format!("amount {s:?} out of range")))
}

/// Decode a fixed-point amount back to a decimal string.
///
/// Trailing fractional zeros are trimmed; whole values decode without a
/// fractional part, zero decodes to "0".
pub fn decode_fixed_point(raw: u128) -> String {
    let int_part = raw / SCALE;
    let frac_part = raw % SCALE;
    if frac_part == 0 {
        return int_part.to_string();
    }
    let mut frac = format!("{frac_part:018}");
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{int_part}.{frac}")
}
