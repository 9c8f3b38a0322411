// ============================================================================
// Numeric Module
// Fixed-point arithmetic for integer-only money handling
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Fixed-point decimal with compile-time precision
// - NumericError: Error types for arithmetic operations
// - Price type alias (2 decimal places, minor units at scale 100)
//
// Design principles:
// - No floating-point operations on money
// - All fallible arithmetic returns Result (no panics)
// - The raw i64 representation is the external wire format

mod errors;
mod fixed_decimal;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{FixedDecimal, Price};
