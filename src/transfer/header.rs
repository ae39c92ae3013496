//! Typed forms of the per-fragment notification units.
//!
//! The collaborating transport delivers two kinds of fragment notification:
//! a start unit declaring a transfer and its total fragment count, and a
//! continuation unit positioning one subsequent fragment. Both headers are
//! small `Copy` values handed to the reassembly buffer together with the
//! fragment's payload bytes; the payload itself never passes through them.

use std::num::NonZeroU32;

use bincode::{Decode, Encode};

use super::{FragmentIndex, TransferId};

/// Header of a fragment-start unit (implicit fragment index 0).
///
/// Carries the authoritative total fragment count for the transfer; the
/// count is positive by construction, so a transfer always has at least its
/// start fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct StartHeader {
    transfer_id: TransferId,
    total_fragments: NonZeroU32,
}

impl StartHeader {
    /// Create a new start header.
    #[must_use]
    pub const fn new(transfer_id: TransferId, total_fragments: NonZeroU32) -> Self {
        Self {
            transfer_id,
            total_fragments,
        }
    }

    /// Return the transfer this unit belongs to.
    #[must_use]
    pub const fn transfer_id(&self) -> TransferId { self.transfer_id }

    /// Return the declared total fragment count.
    #[must_use]
    pub const fn total_fragments(&self) -> NonZeroU32 { self.total_fragments }
}

/// Header of a fragment-continuation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ContinuationHeader {
    transfer_id: TransferId,
    fragment_index: FragmentIndex,
}

impl ContinuationHeader {
    /// Create a new continuation header.
    #[must_use]
    pub const fn new(transfer_id: TransferId, fragment_index: FragmentIndex) -> Self {
        Self {
            transfer_id,
            fragment_index,
        }
    }

    /// Return the transfer this unit belongs to.
    #[must_use]
    pub const fn transfer_id(&self) -> TransferId { self.transfer_id }

    /// Return the fragment's position within the transfer.
    #[must_use]
    pub const fn fragment_index(&self) -> FragmentIndex { self.fragment_index }
}
