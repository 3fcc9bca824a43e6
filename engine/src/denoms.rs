//! Denomination selection.
//!
//! Conversion sites receive their denominations explicitly; these helpers
//! resolve a named denomination out of a currency's published list and
//! refuse to substitute a default when the name is unknown.

use flipinput_common::Denomination;

use crate::error::{FlipError, FlipResult};

/// Find the denomination with the given name. A miss is
/// [`FlipError::MissingDenomination`], never a fallback multiplier.
pub fn find_denomination<'a>(
    denominations: &'a [Denomination],
    name: &str,
) -> FlipResult<&'a Denomination> {
    denominations
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| FlipError::MissingDenomination(name.to_string()))
}

/// The exchange denomination of a currency: the one named after the
/// currency code itself.
pub fn exchange_denomination<'a>(
    denominations: &'a [Denomination],
    currency_code: &str,
) -> FlipResult<&'a Denomination> {
    find_denomination(denominations, currency_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipinput_common::Multiplier;

    fn btc_denominations() -> Vec<Denomination> {
        vec![
            Denomination::new("BTC", Multiplier::new("100000000").unwrap()).with_symbol("₿"),
            Denomination::new("mBTC", Multiplier::new("100000").unwrap()).with_symbol("m₿"),
            Denomination::new("bits", Multiplier::new("100").unwrap()).with_symbol("ƀ"),
            Denomination::new("sats", Multiplier::new("1").unwrap()).with_symbol("s"),
        ]
    }

    #[test]
    fn finds_named_denomination() {
        let denoms = btc_denominations();
        let mbtc = find_denomination(&denoms, "mBTC").unwrap();
        assert_eq!(mbtc.multiplier.as_str(), "100000");
    }

    #[test]
    fn exchange_denomination_matches_currency_code() {
        let denoms = btc_denominations();
        let btc = exchange_denomination(&denoms, "BTC").unwrap();
        assert_eq!(btc.multiplier.as_str(), "100000000");
    }

    #[test]
    fn unknown_name_is_an_error_not_a_default() {
        let denoms = btc_denominations();
        assert_eq!(
            find_denomination(&denoms, "uBTC"),
            Err(FlipError::MissingDenomination("uBTC".to_string()))
        );
    }
}
