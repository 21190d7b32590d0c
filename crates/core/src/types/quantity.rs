//! Line item quantity.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`] strictly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a whole number.
    #[error("invalid quantity: {0:?}")]
    Invalid(String),
    /// The quantity is zero.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A line item quantity. Always at least 1.
///
/// ## Examples
///
/// ```
/// use logos_core::Quantity;
///
/// assert_eq!(Quantity::parse_lenient("3").get(), 3);
/// assert_eq!(Quantity::parse_lenient("0").get(), 1);
/// assert_eq!(Quantity::parse_lenient("abc").get(), 1);
///
/// assert!(Quantity::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest allowed quantity.
    pub const MIN: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `value` is zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// Parse user input the forgiving way a number field is read: leading
    /// whitespace and an optional sign, then the leading run of digits
    /// (hex digits after a `0x` prefix). Anything after the digits is
    /// ignored. Input with no digits becomes 1, and results below 1 are
    /// clamped to 1.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let s = input.trim_start();
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (radix, rest) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            Some(hex) => (16, hex),
            None => (10, rest),
        };

        let end = rest
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(rest.len());
        let digits = rest.get(..end).unwrap_or_default();

        if digits.is_empty() || negative {
            return Self::MIN;
        }

        // Only overflow can fail here; saturate like any other huge input.
        u32::from_str_radix(digits, radix).map_or(Self(u32::MAX), |value| Self(value.max(1)))
    }

    /// Parse a quantity strictly.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a whole number or is zero.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let value = input
            .trim()
            .parse::<u32>()
            .map_err(|_| QuantityError::Invalid(input.to_owned()))?;
        Self::new(value)
    }

    /// Returns the quantity.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns this quantity plus one, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
