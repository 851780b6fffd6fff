//! Items
//!
//! Identifiers and quantities read from a cart line's quantity input.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Cart line identifier, taken from the quantity input's `name`.
///
/// The identifier is opaque to the client; it is only required to be
/// non-blank so that it forms a path segment of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey(String);

impl ItemKey {
    /// Create an item key from an input name.
    ///
    /// # Errors
    ///
    /// Returns [`ItemKeyError::Empty`] when the name is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, ItemKeyError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ItemKeyError::Empty);
        }

        Ok(Self(name))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemKey {
    type Err = ItemKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Errors raised while reading an item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemKeyError {
    #[error("item identifier is empty")]
    Empty,
}

/// Desired quantity of a cart line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// No units; the server drops the line.
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Quantity {
    fn from(units: u32) -> Self {
        Self(units)
    }
}

/// Parses the raw `value` of a quantity input.
///
/// Only plain base-10 digits are accepted, after trimming surrounding ASCII
/// whitespace. Signs, fractions and exponents are rejected.
impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim_ascii();

        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }

        let negative = trimmed
            .strip_prefix('-')
            .is_some_and(|magnitude| !magnitude.is_empty() && is_digits(magnitude));

        if negative {
            return Err(QuantityError::Negative(value.to_string()));
        }

        if !is_digits(trimmed) {
            return Err(QuantityError::NotAnInteger(value.to_string()));
        }

        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_overflow| QuantityError::TooLarge(value.to_string()))
    }
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Errors raised while reading a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("quantity {0:?} is negative")]
    Negative(String),

    #[error("quantity {0:?} is not a whole number")]
    NotAnInteger(String),

    #[error("quantity {0:?} is too large")]
    TooLarge(String),
}
