//! Decimal amount text → integer minor units.
//!
//! The scale is fixed at two fractional digits (100 minor units per major
//! unit). No floating point is involved at any stage.
//!
//! Separator policy:
//! - only `.` present: `.` is the decimal point
//! - only `,` present: `,` is the decimal point
//! - both present: whichever occurs last is the decimal point, every
//!   occurrence of the other is a thousands separator
//!
//! The policy is applied the same way regardless of locale.

use crate::error::ReconError;

const FRACTION_DIGITS: usize = 2;

/// Normalize a free-form decimal amount into signed minor units.
///
/// Empty or whitespace-only input is zero. The fraction is truncated (not
/// rounded) to two digits.
pub fn normalize(raw: &str) -> Result<i64, ReconError> {
    let cleaned: String = raw
        .trim()
        .trim_matches('"')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(0);
    }

    let (negative, body) = if let Some(rest) = cleaned.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = cleaned.strip_prefix('+') {
        (false, rest)
    } else {
        (false, cleaned.as_str())
    };
    // quotes may also sit inside the sign: -"12"
    let body = body.trim_matches('"');
    if body.is_empty() {
        return Err(ReconError::amount(raw));
    }

    let decimal = canonical_decimal(body);
    let (int_part, frac_part) = match decimal.split_once('.') {
        Some((i, f)) => (i, f),
        None => (decimal.as_str(), ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ReconError::amount(raw));
    }

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(ReconError::amount(raw));
    }

    let mut digits = String::with_capacity(int_part.len() + FRACTION_DIGITS);
    digits.push_str(if int_part.is_empty() { "0" } else { int_part });
    digits.push_str(&frac_part[..frac_part.len().min(FRACTION_DIGITS)]);
    for _ in frac_part.len()..FRACTION_DIGITS {
        digits.push('0');
    }

    let value: i64 = digits.parse().map_err(|_| ReconError::amount(raw))?;
    Ok(if negative { -value } else { value })
}

/// Rewrite separators so that `.` is the only decimal point and thousands
/// separators are gone. Leaves any other residue in place for the caller
/// to reject.
fn canonical_decimal(body: &str) -> String {
    let last_dot = body.rfind('.');
    let last_comma = body.rfind(',');
    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if dot > comma => body.replace(',', ""),
        (Some(_), Some(_)) => body.replace('.', "").replace(',', "."),
        (None, Some(_)) => body.replace(',', "."),
        _ => body.to_string(),
    }
}
