//! The denomination model: named unit scales for a currency.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AmountError, AmountResult};

/// Number of native integer units equal to one unit of a denomination.
///
/// Kept as an opaque decimal-string scale factor. It is never compared
/// numerically except through [`crate::decimal`], and it is validated at
/// construction: a positive, integer-valued decimal string. Multipliers
/// are conventionally powers of ten (`"1"`, `"100"`, `"100000000"`), so
/// counting zero digits recovers the unit's fractional precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Multiplier(String);

impl Multiplier {
    /// Validate and wrap a multiplier string.
    pub fn new(value: impl Into<String>) -> AmountResult<Self> {
        let value = value.into();
        let (int_part, frac_part) = match value.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (value.as_str(), None),
        };
        let int_ok = !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit());
        // A fractional part may only be trailing zeros; the value must be
        // integer-valued.
        let frac_ok = match frac_part {
            Some(f) => !f.is_empty() && f.bytes().all(|b| b == b'0'),
            None => true,
        };
        let nonzero = int_part.bytes().any(|b| b.is_ascii_digit() && b != b'0');
        if !int_ok || !frac_ok || !nonzero {
            return Err(AmountError::InvalidMultiplier(value));
        }
        Ok(Self(value))
    }

    /// The multiplier as a decimal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fractional digits one unit of this denomination carries: the count
    /// of zero digits in the multiplier. `"100000000"` => 8, `"1"` => 0.
    pub fn decimals(&self) -> u32 {
        let int_part = self.0.split('.').next().unwrap_or("");
        int_part.bytes().filter(|&b| b == b'0').count() as u32
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Multiplier {
    type Error = AmountError;

    fn try_from(value: String) -> AmountResult<Self> {
        Self::new(value)
    }
}

impl From<Multiplier> for String {
    fn from(value: Multiplier) -> Self {
        value.0
    }
}

/// One unit scale for a currency: a display label, an optional glyph, and
/// the number of native units per unit of this denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    /// Display label for the unit (e.g. "BTC", "mBTC", "USD").
    pub name: String,
    /// Display glyph (e.g. "₿", "$"), if the unit has one.
    pub symbol: Option<String>,
    /// Native units per one unit of this denomination.
    pub multiplier: Multiplier,
}

impl Denomination {
    /// Create a denomination without a symbol.
    pub fn new(name: impl Into<String>, multiplier: Multiplier) -> Self {
        Self {
            name: name.into(),
            symbol: None,
            multiplier,
        }
    }

    /// Attach a display glyph.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The two denominations that describe one side of a conversion.
///
/// Both multipliers are expressed relative to the same native unit. The
/// exchange denomination is the reference unit for price lookups and may
/// differ from what the user sees and edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    /// Currency code used for price lookups (e.g. "BTC", "iso:USD").
    pub currency_code: String,
    /// The denomination the user sees and edits.
    pub display_denomination: Denomination,
    /// The denomination prices are quoted against.
    pub exchange_denomination: Denomination,
}

impl CurrencyInfo {
    /// Create a currency whose display and exchange denominations differ.
    pub fn new(
        currency_code: impl Into<String>,
        display_denomination: Denomination,
        exchange_denomination: Denomination,
    ) -> Self {
        Self {
            currency_code: currency_code.into(),
            display_denomination,
            exchange_denomination,
        }
    }

    /// Create a currency that displays in its exchange denomination, the
    /// common case for fiat.
    pub fn uniform(currency_code: impl Into<String>, denomination: Denomination) -> Self {
        Self {
            currency_code: currency_code.into(),
            display_denomination: denomination.clone(),
            exchange_denomination: denomination,
        }
    }
}
