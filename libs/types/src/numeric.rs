//! Fixed-point numeric types for prices and quantities
//!
//! Prices are carried as integer ticks with four implied decimal places,
//! so all book arithmetic is exact integer arithmetic. `rust_decimal` is
//! used only at the text boundary, where decimal strings are quantized
//! into ticks and ticks are rendered back to canonical decimal text.

use crate::errors::CommandError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Number of implied decimal places in a price tick.
pub const PRICE_DECIMALS: u32 = 4;

/// A limit price as fixed-point ticks (4 implied decimal places)
///
/// `412` parses to 4_120_000 ticks, `510.7` to 5_107_000. Digits beyond
/// the fourth decimal place are truncated, not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Create a price from raw ticks
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Get the raw tick count
    pub const fn ticks(&self) -> u64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = CommandError;

    /// Quantize decimal price text into ticks.
    ///
    /// Fractional digits beyond [`PRICE_DECIMALS`] are truncated; missing
    /// ones are implied zero. Negative or non-decimal text is rejected.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(text)
            .map_err(|_| CommandError::MalformedPrice(text.to_string()))?;
        if decimal.is_sign_negative() {
            return Err(CommandError::MalformedPrice(text.to_string()));
        }

        let truncated = decimal.trunc_with_scale(PRICE_DECIMALS);
        let shift = 10u128.pow(PRICE_DECIMALS - truncated.scale());
        let ticks = truncated.mantissa().unsigned_abs() * shift;

        u64::try_from(ticks)
            .map(Self)
            .map_err(|_| CommandError::MalformedPrice(text.to_string()))
    }
}

impl fmt::Display for Price {
    /// Dequantize ticks back to canonical decimal text.
    ///
    /// Trailing fractional zeros are stripped and the integer part is
    /// never empty (`0.5000` ticks render as `0.5`, zero as `0`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimal = Decimal::from_i128_with_scale(self.0 as i128, PRICE_DECIMALS);
        write!(f, "{}", decimal.normalize())
    }
}

/// An order quantity (whole units)
///
/// Positive while an order is live; reduced in place by partial fills and
/// in-place amends. Unsigned, so it can never go negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    /// Create a quantity from a unit count
    pub const fn new(quantity: u64) -> Self {
        Self(quantity)
    }

    /// The zero quantity
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the unit count
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check whether this quantity is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract, clamping at zero
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(quantity: u64) -> Self {
        Self(quantity)
    }
}
