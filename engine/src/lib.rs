//! FlipInput Conversion Engine
//!
//! Multi-denomination amount conversion with bidirectional field sync.
//! Amounts move between native integer units, display units, and fiat
//! exchange units as decimal strings; no monetary value ever passes
//! through binary floating point.
//!
//! # Features
//!
//! - Curried conversion functions over caller-supplied ratios
//! - Precision adjustment that hides sub-cent crypto decimals
//! - A loop-safe controller for two linked amount fields
//! - Keystroke validation and sanitization
//!
//! # Example
//!
//! ```rust,ignore
//! use flipinput_common::{CurrencyInfo, Denomination, Multiplier};
//! use flipinput_engine::FlipController;
//!
//! let btc = CurrencyInfo::uniform(
//!     "BTC",
//!     Denomination::new("BTC", Multiplier::new("100000000")?).with_symbol("₿"),
//! );
//! let usd = CurrencyInfo::uniform(
//!     "iso:USD",
//!     Denomination::new("USD", Multiplier::new("100")?).with_symbol("$"),
//! );
//!
//! let mut flip = FlipController::new(btc, usd, Some("32533.21".into()))?;
//! let amounts = flip.on_primary_amount_change("0.5")?;
//! assert_eq!(amounts.secondary_amount, "16266.60");
//! ```

pub mod convert;
pub mod denoms;
pub mod error;
pub mod flip;
pub mod precision;
pub mod rates;
pub mod ratio;
pub mod validate;

pub use denoms::{exchange_denomination, find_denomination};
pub use error::{FlipError, FlipResult};
pub use flip::{AmountObserver, AmountPair, AmountSnapshot, EditedField, FlipController};
pub use precision::{
    max_conversion_decimals, precision_adjust, truncate_decimals, PrecisionAdjustParams,
};
pub use rates::{RateQuote, RateSource, RateTable};
pub use ratio::DECIMAL_PRECISION;
pub use validate::{is_valid_input, sanitize_decimal_amount};
