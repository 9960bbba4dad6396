//! Decimal helpers for numeric answers

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Longest literal accepted as a number
pub const MAX_DECIMAL_LEN: usize = 64;

/// Largest power of ten a number may carry, in either direction
pub const MAX_DECIMAL_SCALE: i64 = 64;

/// Parse a user-entered or authored value as a decimal number.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not a
/// decimal literal, and for literals longer than [`MAX_DECIMAL_LEN`] or whose
/// exponent moves the decimal point more than [`MAX_DECIMAL_SCALE`] places.
/// Comparing or rounding such values would expand them digit by digit.
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_DECIMAL_LEN {
        return None;
    }
    let number = BigDecimal::from_str(trimmed).ok()?;
    let (_, scale) = number.as_bigint_and_exponent();
    (scale.abs() <= MAX_DECIMAL_SCALE).then_some(number)
}

/// Round to `places` digits after the decimal point, half away from zero.
///
/// The result always shows exactly `places` fractional digits, so `3` rounded to
/// one place is `"3.0"`. `places` is capped at [`MAX_DECIMAL_SCALE`].
pub fn round_half_up(value: &BigDecimal, places: u32) -> String {
    let places = i64::from(places).min(MAX_DECIMAL_SCALE);
    value
        .with_scale_round(places, RoundingMode::HalfUp)
        .to_string()
}
