//! Precision policy: truncation and the precision-adjustment algorithm.

use flipinput_common::{decimal, AmountResult};
use tracing::warn;

use crate::ratio::DECIMAL_PRECISION;

/// Epsilon countering floating-point error in the order-of-magnitude
/// estimate. Only the *order* of the price goes through `f64`; monetary
/// values never do.
const LOG_EPSILON: f64 = 1e-9;

/// Keep at most `precision` digits after the separator, dropping (not
/// rounding) any excess. `precision = 0` removes the fractional part
/// entirely. The empty string is normalized to `"0"` first.
pub fn truncate_decimals(input: &str, precision: u32) -> String {
    truncate(if input.is_empty() { "0" } else { input }, precision)
}

/// Like [`truncate_decimals`], but the empty string passes through
/// unchanged. Used where a blank field is a meaningful state.
pub fn truncate_decimals_or_blank(input: &str, precision: u32) -> String {
    if input.is_empty() {
        return String::new();
    }
    truncate(input, precision)
}

fn truncate(input: &str, precision: u32) -> String {
    match input.split_once('.') {
        None => input.to_string(),
        Some((integers, _)) if precision == 0 => integers.to_string(),
        Some((integers, decimals)) => {
            let keep = decimals.len().min(precision as usize);
            format!("{integers}.{}", &decimals[..keep])
        }
    }
}

/// Count the zeros between the separator and the first significant
/// fractional digit. `"0.00036"` => 3.
pub fn zeros_after_decimal(input: &str) -> u32 {
    match input.split_once('.') {
        None => 0,
        Some((_, decimals)) => decimals.bytes().take_while(|&b| b == b'0').count() as u32,
    }
}

/// Add one to the least significant digit. `"12.00256"` => `"12.00257"`.
/// Amounts without a fractional part are returned unchanged.
pub fn round_up_to_least_significant(input: &str) -> AmountResult<String> {
    let Some((_, decimals)) = input.split_once('.') else {
        return Ok(input.to_string());
    };
    let one_extra = format!("0.{}1", "0".repeat(decimals.len().saturating_sub(1)));
    decimal::add(input, &one_extra)
}

/// A native fee rendered in display units, keeping
/// `places_beyond_leading_zeros` digits past the leading fractional zeros
/// and rounding up whenever truncation dropped anything. The empty string
/// passes through.
pub fn rounded_display_fee(
    native_amount: &str,
    places_beyond_leading_zeros: u32,
    multiplier: &str,
) -> AmountResult<String> {
    if native_amount.is_empty() {
        return Ok(String::new());
    }
    let display = decimal::div(native_amount, multiplier, DECIMAL_PRECISION)?;
    let precision = zeros_after_decimal(&display) + places_beyond_leading_zeros;
    let truncated = truncate_decimals(&display, precision);
    if decimal::gt(&display, &truncated)? {
        return round_up_to_least_significant(&truncated);
    }
    Ok(truncated)
}

/// Inputs to the precision-adjustment algorithm. The ratio is the live
/// price in secondary exchange units per one primary exchange unit; the
/// multipliers belong to the two exchange denominations.
#[derive(Debug, Clone, Copy)]
pub struct PrecisionAdjustParams<'a> {
    pub exchange_secondary_to_primary_ratio: &'a str,
    pub secondary_exchange_multiplier: &'a str,
    pub primary_exchange_multiplier: &'a str,
}

/// How many decimal places of the primary (crypto) side are economically
/// meaningless because they resolve to less than a tenth of the secondary
/// (fiat) side's smallest unit at the current price. The caller subtracts
/// this from the primary denomination's nominal precision via
/// [`max_conversion_decimals`].
pub fn precision_adjust(params: &PrecisionAdjustParams<'_>) -> u32 {
    match try_precision_adjust(params) {
        Ok(adjust) => adjust,
        Err(err) => {
            warn!(error = %err, "Precision adjustment failed; keeping nominal precision");
            0
        }
    }
}

fn try_precision_adjust(params: &PrecisionAdjustParams<'_>) -> AmountResult<u32> {
    let ratio: f64 = params
        .exchange_secondary_to_primary_ratio
        .parse()
        .unwrap_or(0.0);
    if !(ratio > 0.0) || !ratio.is_finite() {
        return Ok(0);
    }
    let order = (ratio.log10() + LOG_EPSILON).floor() as i32;

    // Price at its order of magnitude, in tenths of the secondary side's
    // smallest unit.
    let tenth_units = decimal::mul(params.secondary_exchange_multiplier, "10")?;
    let rate_at_order = decimal::mul(&pow10(order), &tenth_units)?;
    let adjust = decimal::div(
        &rate_at_order,
        params.primary_exchange_multiplier,
        DECIMAL_PRECISION,
    )?;

    if decimal::lt(&adjust, "1")? {
        let adjust_f: f64 = adjust.parse().unwrap_or(0.0);
        if !(adjust_f > 0.0) {
            // Below representable resolution: every display decimal is
            // under a tenth of the smallest secondary unit.
            return Ok(u32::MAX);
        }
        let order2 = 2 + (adjust_f.log10() - LOG_EPSILON).floor() as i64;
        return Ok(order2.unsigned_abs().min(u64::from(u32::MAX)) as u32);
    }
    Ok(0)
}

/// The primary side's effective conversion precision after shaving off the
/// adjustment, floored at zero.
pub fn max_conversion_decimals(primary_precision: u32, precision_adjust_value: u32) -> u32 {
    primary_precision.saturating_sub(precision_adjust_value)
}

/// Power of ten as a decimal string. `3` => `"1000"`, `-3` => `"0.001"`.
fn pow10(order: i32) -> String {
    if order >= 0 {
        format!("1{}", "0".repeat(order as usize))
    } else {
        format!("0.{}1", "0".repeat((-order - 1) as usize))
    }
}
