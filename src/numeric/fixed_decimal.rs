// ============================================================================
// Fixed-Point Decimal
// Integer-backed decimal arithmetic with compile-time precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as an i64.
///
/// # Type Parameter
/// - `DECIMALS`: Number of decimal places (0-18). Default is 2.
///
/// # Value Range
/// With DECIMALS=2 (default):
/// - Minimum: -92,233,720,368,547,758.08
/// - Maximum: +92,233,720,368,547,758.07
/// - Precision: 0.01 (one minor unit)
///
/// # Example
/// ```
/// use matchbook::numeric::Price;
///
/// let price = Price::from_raw(10050); // 100.50 in minor units
/// assert_eq!(price.to_string(), "100.50");
/// ```
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 2>(i64);

/// Compute 10^n at compile time
const fn pow10(n: u8) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

impl<const D: u8> FixedDecimal<D> {
    /// The scale factor (10^DECIMALS)
    pub const SCALE: i64 = pow10(D);

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(pow10(D));

    /// Maximum representable value
    pub const MAX: Self = Self(i64::MAX);

    /// Minimum representable value
    pub const MIN: Self = Self(i64::MIN);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation.
    ///
    /// Use this when you already have a scaled value (e.g., minor units
    /// crossing an API boundary).
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is too large to represent.
    #[inline]
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        value
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Create from integer and fractional parts.
    ///
    /// # Arguments
    /// - `integer`: The integer part (can be negative)
    /// - `fraction`: The fractional part (must be < SCALE, always positive)
    ///
    /// # Example
    /// ```
    /// use matchbook::numeric::Price;
    ///
    /// // 100.50 with 2 decimals
    /// let p = Price::from_parts(100, 50).unwrap();
    /// assert_eq!(p.raw_value(), 10050);
    /// ```
    #[inline]
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        if fraction >= Self::SCALE as u64 {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = integer
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i64)
        } else {
            fraction as i64
        };

        int_scaled
            .checked_add(frac_signed)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (scaled).
    ///
    /// This is the value × 10^DECIMALS, the external wire representation.
    #[inline]
    pub const fn raw_value(self) -> i64 {
        self.0
    }

    /// Get the integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Get the fractional part as a positive value.
    #[inline]
    pub const fn fractional_part(self) -> u64 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    /// Check if value is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if value is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if value is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 > 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 < 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Midpoint of two values, truncated toward negative infinity on the raw
    /// representation. Uses i128 internally so the sum cannot overflow.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        let sum = self.0 as i128 + other.0 as i128;
        Self((sum / 2) as i64)
    }

    /// Returns the minimum of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the maximum of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u8> Default for FixedDecimal<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: u8> PartialEq for FixedDecimal<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const D: u8> Eq for FixedDecimal<D> {}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.0.cmp(&other.0))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<const D: u8> Hash for FixedDecimal<D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<const D: u8> Neg for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

// Infallible Add/Sub for ergonomics (panics on overflow - use checked_* where
// inputs are not already bounded)
impl<const D: u8> Add for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("FixedDecimal addition overflow")
    }
}

impl<const D: u8> Sub for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("FixedDecimal subtraction overflow")
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.0 < 0 && int_part == 0 {
            // Handle -0.xx case
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Convert from rust_decimal::Decimal.
    ///
    /// This is intended for API boundaries only (parsing user input).
    /// The conversion normalizes the scale to match DECIMALS.
    ///
    /// # Errors
    /// - `PrecisionLoss` if significant digits would be lost
    /// - `Overflow` if the value is too large
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        use rust_decimal::prelude::ToPrimitive;

        let decimal_scale = d.scale();
        let target_scale = D as u32;

        // Multiply to get the raw integer representation at target scale
        let multiplier = rust_decimal::Decimal::from(Self::SCALE);
        let scaled = d * multiplier;

        let raw = scaled.to_i64().ok_or(NumericError::Overflow)?;

        // Check for precision loss: if decimal has more precision than target
        if decimal_scale > target_scale {
            let reconstructed =
                rust_decimal::Decimal::from(raw) / rust_decimal::Decimal::from(Self::SCALE);
            if reconstructed != d {
                return Err(NumericError::PrecisionLoss);
            }
        }

        Ok(Self(raw))
    }

    /// Convert to rust_decimal::Decimal.
    ///
    /// This is intended for display/debugging only.
    pub fn to_decimal(self) -> rust_decimal::Decimal {
        let mut d = rust_decimal::Decimal::from(self.0);
        d.set_scale(D as u32).expect("valid scale");
        d
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.00
    /// - "100.50" -> 100.50
    /// - "-0.01" -> -0.01
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumericError::InvalidInput);
        }

        let (is_negative, s) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else {
            (false, s)
        };

        let (int_str, frac_str) = if let Some(pos) = s.find('.') {
            (&s[..pos], Some(&s[pos + 1..]))
        } else {
            (s, None)
        };

        let int_val: i64 = if int_str.is_empty() {
            0
        } else {
            int_str.parse().map_err(|_| NumericError::InvalidInput)?
        };

        let frac_val: u64 = if let Some(frac) = frac_str {
            if frac.is_empty() {
                0
            } else if frac.len() > D as usize {
                return Err(NumericError::PrecisionLoss);
            } else {
                // Pad with zeros to reach DECIMALS length
                let padded = format!("{:0<width$}", frac, width = D as usize);
                padded.parse().map_err(|_| NumericError::InvalidInput)?
            }
        } else {
            0
        };

        let mut result = Self::from_parts(int_val, frac_val)?;
        if is_negative {
            result = -result;
        }

        Ok(result)
    }
}

// ============================================================================
// Type Alias
// ============================================================================

/// Price in minor units: 2 decimal places, so 10050 displays as "100.50"
pub type Price = FixedDecimal<2>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Price::SCALE, 100);
        assert_eq!(Price::ZERO.raw_value(), 0);
        assert_eq!(Price::ONE.raw_value(), 100);
    }

    #[test]
    fn test_from_integer() {
        let x = Price::from_integer(100).unwrap();
        assert_eq!(x.raw_value(), 10_000);
        assert_eq!(x.integer_part(), 100);
        assert_eq!(x.fractional_part(), 0);
    }

    #[test]
    fn test_from_parts() {
        // 100.50
        let x = Price::from_parts(100, 50).unwrap();
        assert_eq!(x.integer_part(), 100);
        assert_eq!(x.fractional_part(), 50);
        assert_eq!(x.to_string(), "100.50");

        // -5.25
        let y = Price::from_parts(-5, 25).unwrap();
        assert_eq!(y.integer_part(), -5);
        assert_eq!(y.fractional_part(), 25);
        assert!(y.is_negative());
    }

    #[test]
    fn test_from_parts_invalid() {
        // Fraction >= SCALE should fail
        let result = Price::from_parts(1, 100);
        assert_eq!(result, Err(NumericError::InvalidInput));
    }

    #[test]
    fn test_checked_add() {
        let a = Price::from_integer(100).unwrap();
        let b = Price::from_integer(50).unwrap();
        let c = a.checked_add(b).unwrap();
        assert_eq!(c.integer_part(), 150);

        let max = Price::MAX;
        let result = max.checked_add(Price::ONE);
        assert_eq!(result, Err(NumericError::Overflow));
    }

    #[test]
    fn test_checked_sub() {
        let a = Price::from_integer(100).unwrap();
        let b = Price::from_integer(30).unwrap();
        let c = a.checked_sub(b).unwrap();
        assert_eq!(c.integer_part(), 70);

        // Negative result
        let d = b.checked_sub(a).unwrap();
        assert_eq!(d.integer_part(), -70);

        let min = Price::MIN;
        let result = min.checked_sub(Price::ONE);
        assert_eq!(result, Err(NumericError::Underflow));
    }

    #[test]
    fn test_midpoint() {
        let bid = Price::from_raw(9_900);
        let ask = Price::from_raw(10_100);
        assert_eq!(bid.midpoint(ask).raw_value(), 10_000);

        // Integer division truncates the odd minor unit
        let a = Price::from_raw(10_000);
        let b = Price::from_raw(10_001);
        assert_eq!(a.midpoint(b).raw_value(), 10_000);

        // Large values must not overflow the intermediate sum
        assert_eq!(Price::MAX.midpoint(Price::MAX), Price::MAX);
    }

    #[test]
    fn test_comparison() {
        let a = Price::from_integer(100).unwrap();
        let b = Price::from_integer(50).unwrap();

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_raw(10_050).to_string(), "100.50");
        assert_eq!(Price::from_raw(0).to_string(), "0.00");
        assert_eq!(Price::from_raw(5).to_string(), "0.05");
        assert_eq!(Price::from_raw(-1).to_string(), "-0.01");
        assert_eq!(Price::from_raw(-10_050).to_string(), "-100.50");
    }

    #[test]
    fn test_from_str() {
        let x: Price = "100.50".parse().unwrap();
        assert_eq!(x.raw_value(), 10_050);

        let y: Price = "-0.01".parse().unwrap();
        assert!(y.is_negative());
        assert_eq!(y.raw_value(), -1);

        let z: Price = "42".parse().unwrap();
        assert_eq!(z.integer_part(), 42);
        assert_eq!(z.fractional_part(), 0);
    }

    #[test]
    fn test_from_str_invalid() {
        let result: Result<Price, _> = "not_a_number".parse();
        assert_eq!(result, Err(NumericError::InvalidInput));

        // Too many decimals
        let result: Result<Price, _> = "1.005".parse();
        assert_eq!(result, Err(NumericError::PrecisionLoss));
    }

    #[test]
    fn test_from_decimal() {
        use rust_decimal::Decimal;

        let d = Decimal::new(10_050, 2); // 100.50
        let x = Price::from_decimal(d).unwrap();
        assert_eq!(x.raw_value(), 10_050);
    }

    #[test]
    fn test_to_decimal() {
        let x = Price::from_raw(10_050);
        assert_eq!(x.to_decimal().to_string(), "100.50");
    }

    #[test]
    fn test_negation() {
        let x = Price::from_integer(100).unwrap();
        let neg_x = -x;
        assert_eq!(neg_x.integer_part(), -100);
        assert_eq!((-neg_x).integer_part(), 100);
    }

    #[test]
    fn test_different_decimal_places() {
        type FD4 = FixedDecimal<4>;

        assert_eq!(FD4::SCALE, 10_000);

        let x = FD4::from_parts(123, 4567).unwrap();
        assert_eq!(x.to_string(), "123.4567");
    }
}
