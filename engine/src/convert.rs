//! Curried conversion functions.
//!
//! Each constructor is configured with a ratio once — validating it and
//! rejecting a zero ratio up front — and returns a closure that can be
//! applied to many amounts. All amounts are decimal strings.

use flipinput_common::{decimal, AmountError, AmountResult};

use crate::ratio::DECIMAL_PRECISION;

fn checked_ratio(ratio: &str) -> AmountResult<String> {
    let parsed = decimal::parse_amount(ratio)?;
    if parsed.is_zero() {
        return Err(AmountError::DivisionByZero);
    }
    Ok(ratio.to_string())
}

/// Native integer units → display units: `native / ratio`, truncated to
/// [`DECIMAL_PRECISION`] fractional digits.
///
/// The same function converts native → exchange units when handed the
/// exchange denomination's multiplier as the ratio.
pub fn native_to_display(
    native_to_display_ratio: &str,
) -> AmountResult<impl Fn(&str) -> AmountResult<String>> {
    let ratio = checked_ratio(native_to_display_ratio)?;
    Ok(move |native: &str| decimal::div(native, &ratio, DECIMAL_PRECISION))
}

/// Display units → native integer units: `display * ratio`.
///
/// The empty string is a defined identity: "no amount entered" converts
/// to "no amount entered".
pub fn display_to_native(
    native_to_display_ratio: &str,
) -> AmountResult<impl Fn(&str) -> AmountResult<String>> {
    let ratio = checked_ratio(native_to_display_ratio)?;
    Ok(move |display: &str| {
        if display.is_empty() {
            return Ok(String::new());
        }
        decimal::mul(display, &ratio)
    })
}

/// Display units → exchange units of the same currency:
/// `display / ratio`, where the ratio is
/// `exchange_multiplier / display_multiplier`.
pub fn display_to_exchange(
    display_to_exchange_ratio: &str,
) -> AmountResult<impl Fn(&str) -> AmountResult<String>> {
    let ratio = checked_ratio(display_to_exchange_ratio)?;
    Ok(move |display: &str| decimal::div(display, &ratio, DECIMAL_PRECISION))
}

/// Exchange units → display units of the same currency:
/// `exchange * ratio`.
pub fn exchange_to_display(
    display_to_exchange_ratio: &str,
) -> AmountResult<impl Fn(&str) -> AmountResult<String>> {
    let ratio = checked_ratio(display_to_exchange_ratio)?;
    Ok(move |exchange: &str| decimal::mul(exchange, &ratio))
}

/// Exchange units of currency A → exchange units of currency B, given the
/// live price "units of B per one unit of A".
pub fn exchange_to_exchange(
    price_ratio: &str,
) -> AmountResult<impl Fn(&str) -> AmountResult<String>> {
    let ratio = checked_ratio(price_ratio)?;
    Ok(move |amount: &str| decimal::mul(amount, &ratio))
}
