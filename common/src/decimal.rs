//! Decimal-string arithmetic.
//!
//! Every monetary value in the engine is carried as a decimal string and
//! operated on through this module. No binary floating-point type ever
//! holds a monetary value; `rust_decimal` does the arithmetic behind the
//! string boundary.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{AmountError, AmountResult};

/// Parse a decimal string, tolerating the partial forms a user can type
/// mid-edit (`".5"`, `"5."`, a lone `"."`).
pub fn parse_amount(input: &str) -> AmountResult<Decimal> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::InvalidAmount(input.to_string()));
    }
    let mut normalized = s.to_string();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    if normalized.ends_with('.') {
        normalized.pop();
    }
    Decimal::from_str(&normalized).map_err(|_| AmountError::InvalidAmount(input.to_string()))
}

/// Render a decimal back to its canonical string form: no exponent, no
/// trailing fractional zeros.
fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Add two decimal strings.
pub fn add(a: &str, b: &str) -> AmountResult<String> {
    let sum = parse_amount(a)?
        .checked_add(parse_amount(b)?)
        .ok_or(AmountError::Overflow)?;
    Ok(format_amount(sum))
}

/// Multiply two decimal strings.
pub fn mul(a: &str, b: &str) -> AmountResult<String> {
    let product = parse_amount(a)?
        .checked_mul(parse_amount(b)?)
        .ok_or(AmountError::Overflow)?;
    Ok(format_amount(product))
}

/// Divide two decimal strings, truncating (never rounding) the quotient to
/// `precision` fractional digits.
pub fn div(a: &str, b: &str, precision: u32) -> AmountResult<String> {
    let numerator = parse_amount(a)?;
    let denominator = parse_amount(b)?;
    if denominator.is_zero() {
        return Err(AmountError::DivisionByZero);
    }
    let quotient = numerator
        .checked_div(denominator)
        .ok_or(AmountError::Overflow)?;
    Ok(format_amount(quotient.trunc_with_scale(precision)))
}

/// Compare two decimal strings numerically.
pub fn compare(a: &str, b: &str) -> AmountResult<Ordering> {
    Ok(parse_amount(a)?.cmp(&parse_amount(b)?))
}

/// `a < b`
pub fn lt(a: &str, b: &str) -> AmountResult<bool> {
    Ok(compare(a, b)? == Ordering::Less)
}

/// `a > b`
pub fn gt(a: &str, b: &str) -> AmountResult<bool> {
    Ok(compare(a, b)? == Ordering::Greater)
}

/// `a >= b`
pub fn gte(a: &str, b: &str) -> AmountResult<bool> {
    Ok(compare(a, b)? != Ordering::Less)
}

/// `a == b` numerically (`"1.0"` equals `"1"`).
pub fn eq(a: &str, b: &str) -> AmountResult<bool> {
    Ok(compare(a, b)? == Ordering::Equal)
}

/// True for the empty string and for any string that parses to zero.
/// Unparseable strings are not zero.
pub fn is_zero_string(input: &str) -> bool {
    if input.trim().is_empty() {
        return true;
    }
    matches!(parse_amount(input), Ok(value) if value.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_partial_user_input() {
        assert_eq!(parse_amount(".5").unwrap(), dec!(0.5));
        assert_eq!(parse_amount("5.").unwrap(), dec!(5));
        assert_eq!(parse_amount(".").unwrap(), Decimal::ZERO);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("0x10").is_err());
        assert!(parse_amount("1.2.3").is_err());
    }

    #[test]
    fn add_normalizes_output() {
        assert_eq!(add("1.50", "0.50").unwrap(), "2");
        assert_eq!(add("0.1", "0.2").unwrap(), "0.3");
    }

    #[test]
    fn mul_keeps_integer_scale() {
        assert_eq!(mul("1", "100000000").unwrap(), "100000000");
        assert_eq!(mul("0.001", "1000").unwrap(), "1");
    }

    #[test]
    fn div_truncates_not_rounds() {
        assert_eq!(div("2", "3", 4).unwrap(), "0.6666");
        assert_eq!(div("1", "3", 18).unwrap(), "0.333333333333333333");
        assert_eq!(div("100000000", "100000000", 18).unwrap(), "1");
    }

    #[test]
    fn div_by_zero_is_an_error() {
        assert_eq!(div("1", "0", 8), Err(AmountError::DivisionByZero));
        assert_eq!(div("1", "0.000", 8), Err(AmountError::DivisionByZero));
    }

    #[test]
    fn division_at_native_scale() {
        // 18-decimal native units survive the round trip without float drift
        assert_eq!(
            div("123456789012345678901", "1000000000000000000", 18).unwrap(),
            "123.456789012345678901"
        );
    }

    #[test]
    fn comparisons_are_numeric() {
        assert!(eq("1.0", "1").unwrap());
        assert!(lt("0.999999999999999999", "1").unwrap());
        assert!(gt("100000000", "99999999.999").unwrap());
        assert!(gte("2", "2").unwrap());
    }

    #[test]
    fn zero_string_detection() {
        assert!(is_zero_string(""));
        assert!(is_zero_string("0"));
        assert!(is_zero_string("0.000"));
        assert!(!is_zero_string("0.0001"));
        assert!(!is_zero_string("abc"));
    }
}
