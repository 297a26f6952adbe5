//! Fixed-point money.
//!
//! All monetary values are whole dollars stored as `i64`. There is no
//! floating point anywhere in the economy: scaling by percentages goes
//! through [`Cash::percent`], which widens to `i128` before dividing.

use serde::{Deserialize, Serialize};

/// An amount of money in whole dollars.
///
/// ```
/// use bubble_engine::core::Cash;
///
/// let cash = Cash::new(500_000);
/// assert_eq!(cash.percent(20), Cash::new(100_000));
/// assert_eq!(cash.checked_sub(Cash::new(600_000)), None);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cash(pub i64);

impl Cash {
    /// Zero dollars.
    pub const ZERO: Cash = Cash(0);

    /// Create an amount.
    #[must_use]
    pub const fn new(dollars: i64) -> Self {
        Self(dollars)
    }

    /// Raw dollar value.
    #[must_use]
    pub const fn dollars(self) -> i64 {
        self.0
    }

    /// Is this amount negative?
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Is this amount zero?
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add, saturating at `i64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Cash) -> Cash {
        Cash(self.0.saturating_add(other.0))
    }

    /// Subtract, returning `None` on overflow or if the result is negative.
    #[must_use]
    pub fn checked_sub(self, other: Cash) -> Option<Cash> {
        self.0
            .checked_sub(other.0)
            .filter(|v| *v >= 0)
            .map(Cash)
    }

    /// Multiply by an integer count, saturating.
    #[must_use]
    pub const fn times(self, count: u32) -> Cash {
        Cash(self.0.saturating_mul(count as i64))
    }

    /// Take `pct` percent of this amount, rounding toward zero.
    #[must_use]
    pub fn percent(self, pct: u32) -> Cash {
        self.ratio(i128::from(pct), 100)
    }

    /// Scale by `num / den` using 128-bit intermediates, clamped to `i64`.
    ///
    /// A zero denominator yields zero.
    #[must_use]
    pub fn ratio(self, num: i128, den: i128) -> Cash {
        if den == 0 {
            return Cash::ZERO;
        }
        let scaled = i128::from(self.0) * num / den;
        Cash(clamp_i128(scaled))
    }

    /// The smaller of two amounts.
    #[must_use]
    pub fn min(self, other: Cash) -> Cash {
        std::cmp::min(self, other)
    }
}

pub(crate) fn clamp_i128(value: i128) -> i64 {
    if value > i128::from(i64::MAX) {
        i64::MAX
    } else if value < i128::from(i64::MIN) {
        i64::MIN
    } else {
        value as i64
    }
}

impl From<i64> for Cash {
    fn from(dollars: i64) -> Self {
        Self(dollars)
    }
}

impl std::fmt::Display for Cash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}
