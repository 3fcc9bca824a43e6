//! Error types shared across the FlipInput engine.

use thiserror::Error;

/// Errors raised by decimal-string arithmetic and denomination validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The string is not a parseable decimal amount.
    #[error("Invalid decimal amount: {0:?}")]
    InvalidAmount(String),

    /// Division by a zero denominator or ratio.
    #[error("Division by zero")]
    DivisionByZero,

    /// The result exceeds the range of the decimal backend.
    #[error("Decimal overflow")]
    Overflow,

    /// A denomination multiplier failed validation.
    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(String),
}

/// Result type alias for amount operations.
pub type AmountResult<T> = Result<T, AmountError>;
