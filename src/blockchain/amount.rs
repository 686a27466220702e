// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-point scaling of raw on-chain integer balances.
//!
//! Raw balances are arbitrary-precision unsigned integers. They are never
//! squeezed through a fixed-width type: an 18-decimal token can hold values
//! well past `u64::MAX`, and some upstreams return more than 32 bytes.

use num_bigint::BigUint;

/// Largest accepted scale. ERC-20 `decimals()` is a `uint8`.
pub const MAX_SCALE: u32 = u8::MAX as u32;

/// Errors raised while decoding a raw balance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid balance encoding {raw:?}: {reason}")]
    InvalidEncoding { raw: String, reason: &'static str },
}

/// A raw balance exactly as the upstream returned it.
///
/// `eth_call` results are hex; aggregator asset lists carry a decimal
/// integer. The original text is kept so the client sees what upstream sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBalance {
    Hex(String),
    Decimal(String),
}

impl RawBalance {
    pub fn as_str(&self) -> &str {
        match self {
            RawBalance::Hex(raw) | RawBalance::Decimal(raw) => raw,
        }
    }

    /// Textual zero check.
    ///
    /// Only the literal encodings `"0"` and `"0x0"` count as zero. Padded
    /// forms such as `"0x00"` are treated as non-zero.
    pub fn is_literal_zero(&self) -> bool {
        matches!(self.as_str(), "0" | "0x0")
    }

    /// Scale the balance down by `10^scale` into a canonical decimal string.
    pub fn to_decimal_string(&self, scale: u32) -> Result<String, AmountError> {
        match self {
            RawBalance::Hex(raw) => to_decimal_string(raw, scale),
            RawBalance::Decimal(raw) => {
                check_scale(raw, scale)?;
                Ok(format_units(&parse_decimal(raw)?, scale))
            }
        }
    }

    /// Classify an upstream string whose radix is not fixed by the API:
    /// `0x`-prefixed text is hex, anything else decimal.
    pub fn detect(raw: String) -> Self {
        if raw.starts_with("0x") || raw.starts_with("0X") {
            RawBalance::Hex(raw)
        } else {
            RawBalance::Decimal(raw)
        }
    }
}

/// Convert a hex-encoded integer into a decimal string scaled by `10^scale`.
///
/// The fractional part is left-padded to `scale` digits, then stripped of
/// trailing zeros; when nothing remains the separator is dropped too.
///
/// ```
/// use wallet_assets_server::blockchain::amount::to_decimal_string;
///
/// assert_eq!(to_decimal_string("0x0de0b6b3a7640000", 18).unwrap(), "1");
/// assert_eq!(to_decimal_string("0x1e8480", 6).unwrap(), "2");
/// assert_eq!(to_decimal_string("0x0", 18).unwrap(), "0");
/// ```
pub fn to_decimal_string(raw_hex: &str, scale: u32) -> Result<String, AmountError> {
    check_scale(raw_hex, scale)?;
    let value = parse_hex(raw_hex)?;
    Ok(format_units(&value, scale))
}

fn check_scale(raw: &str, scale: u32) -> Result<(), AmountError> {
    if scale > MAX_SCALE {
        return Err(AmountError::InvalidEncoding {
            raw: raw.to_string(),
            reason: "scale exceeds 255 decimals",
        });
    }
    Ok(())
}

/// Parse a hex integer, with or without a `0x` prefix.
pub fn parse_hex(raw: &str) -> Result<BigUint, AmountError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    parse_digits(raw, digits, 16)
}

/// Parse a base-10 integer.
pub fn parse_decimal(raw: &str) -> Result<BigUint, AmountError> {
    parse_digits(raw, raw, 10)
}

fn parse_digits(raw: &str, digits: &str, radix: u32) -> Result<BigUint, AmountError> {
    if digits.is_empty() {
        return Err(AmountError::InvalidEncoding {
            raw: raw.to_string(),
            reason: "no digits",
        });
    }
    // `BigUint::parse_bytes` tolerates `_` separators and a sign, neither of
    // which is a valid upstream encoding.
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(AmountError::InvalidEncoding {
            raw: raw.to_string(),
            reason: if radix == 16 {
                "expected hexadecimal digits"
            } else {
                "expected decimal digits"
            },
        });
    }
    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| AmountError::InvalidEncoding {
        raw: raw.to_string(),
        reason: "unparseable integer",
    })
}

/// Render `value / 10^scale` without trailing fractional zeros.
pub fn format_units(value: &BigUint, scale: u32) -> String {
    let divisor = BigUint::from(10u32).pow(scale);
    let whole = value / &divisor;
    let remainder = value % &divisor;

    let digits = remainder.to_string();
    let mut fraction = "0".repeat((scale as usize).saturating_sub(digits.len()));
    fraction.push_str(&digits);
    let trimmed = fraction.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{trimmed}")
    }
}
