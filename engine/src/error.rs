//! Conversion engine error types.

use flipinput_common::AmountError;
use thiserror::Error;

/// Errors that can occur in the conversion engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlipError {
    /// Decimal arithmetic or multiplier validation failed.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A keystroke is not a valid partial decimal number.
    #[error("Invalid input: {0:?}")]
    InvalidInput(String),

    /// A currency's denomination could not be found; conversions must not
    /// substitute a default multiplier.
    #[error("Missing denomination for {0}")]
    MissingDenomination(String),

    /// The price ratio collaborator has not produced a usable value.
    #[error("Ratio unavailable for {base}/{quote}")]
    RatioUnavailable { base: String, quote: String },
}

/// Result type for engine operations.
pub type FlipResult<T> = Result<T, FlipError>;
