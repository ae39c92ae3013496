//! Zero-based fragment positioning within a transfer.

use std::num::TryFromIntError;

use bincode::{Decode, Encode};
use derive_more::{Display, From};

/// Zero-based ordinal describing a fragment's position within its transfer.
///
/// Index 0 is always carried by the fragment-start unit; continuation units
/// carry indices 1 and up.
///
/// # Examples
///
/// ```
/// use fraglink::FragmentIndex;
/// let index = FragmentIndex::zero();
/// assert!(index.is_start());
/// assert_eq!(index.checked_increment().map(FragmentIndex::get), Some(1));
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, Display, From,
)]
#[display("{_0}")]
pub struct FragmentIndex(u32);

impl FragmentIndex {
    /// Construct an index from a `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the index of the fragment-start unit.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Whether this index names the fragment-start unit.
    #[must_use]
    pub const fn is_start(self) -> bool { self.0 == 0 }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Increment the index, returning `None` on overflow.
    #[must_use]
    pub fn checked_increment(self) -> Option<Self> { self.0.checked_add(1).map(Self) }
}

impl TryFrom<usize> for FragmentIndex {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> { u32::try_from(value).map(Self) }
}

impl From<FragmentIndex> for u32 {
    fn from(value: FragmentIndex) -> Self { value.0 }
}
