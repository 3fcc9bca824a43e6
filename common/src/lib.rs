//! FlipInput Common Types
//!
//! This crate contains the types shared across the FlipInput engine:
//! decimal-string arithmetic, the denomination model, and error types.

pub mod decimal;
pub mod denomination;
pub mod error;

pub use decimal::*;
pub use denomination::*;
pub use error::*;
