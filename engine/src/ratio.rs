//! Ratio derivation between denominations.

use flipinput_common::{decimal, AmountResult, CurrencyInfo};

/// Fractional digits carried through every chained division. High enough
/// that truncation error does not compound across the display → exchange →
/// exchange → display pipeline.
pub const DECIMAL_PRECISION: u32 = 18;

/// Units of the exchange denomination per one unit of the display
/// denomination for the same currency: `exchange_multiplier /
/// display_multiplier`. `"1000"` for mBTC against a BTC exchange unit.
pub fn display_to_exchange_ratio(info: &CurrencyInfo) -> AmountResult<String> {
    decimal::div(
        info.exchange_denomination.multiplier.as_str(),
        info.display_denomination.multiplier.as_str(),
        DECIMAL_PRECISION,
    )
}

/// The secondary→primary price re-expressed in *display* units of both
/// sides.
///
/// `price` arrives in exchange units (e.g. USD per BTC). When the user
/// edits mBTC and sees USD, the field-to-field ratio is
/// `price / primary_display_to_exchange * secondary_display_to_exchange`.
pub fn display_flip_ratio(
    primary: &CurrencyInfo,
    secondary: &CurrencyInfo,
    price: &str,
) -> AmountResult<String> {
    let primary_ratio = display_to_exchange_ratio(primary)?;
    let secondary_ratio = display_to_exchange_ratio(secondary)?;
    let in_primary_display = decimal::div(price, &primary_ratio, DECIMAL_PRECISION)?;
    decimal::mul(&in_primary_display, &secondary_ratio)
}
