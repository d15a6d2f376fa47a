//! Allocation percentage with validation semantics.
//!
//! Allocation in resman is not just a number—it is the share of an
//! engineer's capacity that one assignment consumes. It is always an
//! integer percentage in [0, 100] and always a multiple of 5, matching
//! how staffing plans are actually written.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Granularity of allocation percentages.
pub const ALLOCATION_STEP: u8 = 5;

/// A validated allocation percentage.
///
/// Constructed via [`Allocation::new`], which enforces the range and
/// step invariants. Once constructed, the value is immutable.
///
/// # Examples
///
/// ```
/// use resman::Allocation;
///
/// let half = Allocation::new(50).unwrap();
/// assert_eq!(half.percent(), 50);
///
/// assert!(Allocation::new(101).is_err());
/// assert!(Allocation::new(33).is_err()); // not a multiple of 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(u8);

impl Allocation {
    /// Creates an allocation from an integer percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AllocationOutOfRange`] if `percent > 100`,
    /// or [`ValidationError::AllocationNotFivePercentStep`] if `percent` is
    /// not a multiple of 5.
    pub fn new(percent: u8) -> Result<Self, ValidationError> {
        if percent > 100 {
            return Err(ValidationError::AllocationOutOfRange { value: percent });
        }
        if percent % ALLOCATION_STEP != 0 {
            return Err(ValidationError::AllocationNotFivePercentStep { value: percent });
        }
        Ok(Self(percent))
    }

    /// A zero allocation.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// An allocation consuming an entire full-time capacity.
    #[must_use]
    pub const fn full() -> Self {
        Self(100)
    }

    /// Returns the raw percentage value.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Returns true if this allocation consumes no capacity.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// Totals across assignments can exceed 100 while an engineer is
// over-committed, so sums widen to u16 rather than staying Allocation.
impl Sum<Allocation> for u16 {
    fn sum<I: Iterator<Item = Allocation>>(iter: I) -> u16 {
        iter.map(|a| u16::from(a.0)).sum()
    }
}
