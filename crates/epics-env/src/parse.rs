// crates/epics-env/src/parse.rs
// ============================================================================
// Module: Parameter Text Parsing
// Description: Converters from parameter text to typed values.
// Purpose: Interpret environment strings as integers, reals, and addresses.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Numeric parsing follows C `scanf` conventions: leading whitespace is
//! skipped, the longest numeric prefix is converted, and trailing text is
//! ignored. Reals also accept C99 hexadecimal notation (`0x1.8p3`).
//! Addresses must be strict dotted quads.
//!
//! All converters return `None` on failure; the accessor attaches the
//! parameter name and logs the offending text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::Ipv4Addr;

// ============================================================================
// SECTION: Converters
// ============================================================================

/// Parses a base-10 signed integer prefix.
#[must_use]
pub fn parse_long(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[.. end].parse().ok()
}

/// Parses a floating-point prefix.
#[must_use]
pub fn parse_double(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);

    if let Some(len) = special_len(&text[sign ..]) {
        return text[.. sign + len].parse().ok();
    }
    if let Some(magnitude) = parse_hex_magnitude(&bytes[sign ..]) {
        return Some(if bytes.first() == Some(&b'-') { -magnitude } else { magnitude });
    }

    let mut end = sign;
    let int_digits = count_digits(&bytes[end ..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1 ..]);
        end += 1 + frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = sign_len(&bytes[end + 1 ..]);
        let exp_digits = count_digits(&bytes[end + 1 + exp_sign ..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }
    text[.. end].parse().ok()
}

/// Parses a dotted-quad IPv4 address, ignoring surrounding whitespace.
#[must_use]
pub fn parse_inet_addr(text: &str) -> Option<Ipv4Addr> {
    text.trim().parse().ok()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns 1 when the input starts with a sign character.
fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

/// Counts leading ASCII digits.
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Returns the byte length of a leading `inf`, `infinity`, or `nan` token.
fn special_len(text: &str) -> Option<usize> {
    let lower = text.get(.. 8).unwrap_or(text).to_ascii_lowercase();
    if lower.starts_with("infinity") {
        Some(8)
    } else if lower.starts_with("inf") || lower.starts_with("nan") {
        Some(3)
    } else {
        None
    }
}

/// Largest mantissa accumulated before further hex digits only scale it.
const HEX_MANTISSA_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Parses an unsigned hexadecimal float prefix such as `0x1.8p3`.
///
/// Returns `None` when no hex digit follows the `0x` prefix, leaving the
/// input to the decimal path (which reads the leading `0`).
fn parse_hex_magnitude(bytes: &[u8]) -> Option<f64> {
    if !matches!(bytes, [b'0', b'x' | b'X', ..]) {
        return None;
    }
    let mut index = 2;
    let mut mantissa = 0.0_f64;
    let mut exponent = 0_i32;
    let mut any_digit = false;
    while let Some(digit) = bytes.get(index).and_then(|byte| hex_digit(*byte)) {
        if mantissa < HEX_MANTISSA_LIMIT {
            mantissa = mantissa.mul_add(16.0, f64::from(digit));
        } else {
            exponent = exponent.saturating_add(4);
        }
        any_digit = true;
        index += 1;
    }
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        while let Some(digit) = bytes.get(index).and_then(|byte| hex_digit(*byte)) {
            if mantissa < HEX_MANTISSA_LIMIT {
                mantissa = mantissa.mul_add(16.0, f64::from(digit));
                exponent = exponent.saturating_sub(4);
            }
            any_digit = true;
            index += 1;
        }
    }
    if !any_digit {
        return None;
    }
    if matches!(bytes.get(index), Some(b'p' | b'P')) {
        let rest = &bytes[index + 1 ..];
        let exp_sign = sign_len(rest);
        let exp_digits = count_digits(&rest[exp_sign ..]);
        let mut binary_exponent = 0_i32;
        for byte in &rest[exp_sign .. exp_sign + exp_digits] {
            binary_exponent =
                binary_exponent.saturating_mul(10).saturating_add(i32::from(byte - b'0'));
        }
        if rest.first() == Some(&b'-') {
            binary_exponent = -binary_exponent;
        }
        exponent = exponent.saturating_add(binary_exponent);
    }
    Some(scale_by_pow2(mantissa, exponent))
}

/// Returns the value of an ASCII hex digit.
fn hex_digit(byte: u8) -> Option<u32> {
    char::from(byte).to_digit(16)
}

/// Multiplies `value` by `2^exponent` without overflowing intermediate powers.
fn scale_by_pow2(mut value: f64, mut exponent: i32) -> f64 {
    const STEP: i32 = 1000;
    while exponent > STEP && value.is_finite() && value != 0.0 {
        value *= 2.0_f64.powi(STEP);
        exponent -= STEP;
    }
    while exponent < -STEP && value != 0.0 {
        value *= 2.0_f64.powi(-STEP);
        exponent += STEP;
    }
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    value * 2.0_f64.powi(exponent)
}

#[cfg(test)]
mod tests;
