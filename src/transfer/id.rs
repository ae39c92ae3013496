//! Identifiers for outbound and inbound transfers.

use bincode::{Decode, Encode};
use derive_more::{Display, From, Into};

/// Wire identifier shared by all fragments of one transfer.
///
/// Transfer IDs live in a deliberately small namespace, [0, 255], scoped to
/// one logical connection. The sending side reuses a value only after the
/// transfer holding it has been freed, so at most 256 transfers can be
/// in flight per direction at once. "Unassigned" is not representable here;
/// outbound transfers hold `Option<TransferId>` until allocation succeeds.
///
/// # Examples
///
/// ```
/// use fraglink::TransferId;
/// let id = TransferId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, Display, From, Into,
)]
#[display("{_0}")]
pub struct TransferId(u8);

impl TransferId {
    /// Largest value in the transfer-ID namespace.
    pub const MAX: Self = Self(u8::MAX);

    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }
}

/// Opaque handle naming a live outbound transfer within a
/// [`SendRegistry`](crate::SendRegistry).
///
/// Keys are allocated monotonically and never reused, unlike [`TransferId`]
/// values. The collaborator carries the key alongside each outbound
/// sub-message instead of a direct reference to the transfer; a key whose
/// transfer has since been freed simply resolves to nothing, so there is no
/// dangling back-pointer to guard against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct TransferKey(u64);

impl TransferKey {
    /// Create a key from its numeric value.
    ///
    /// Only keys previously returned by
    /// [`SendRegistry::allocate_transfer`](crate::SendRegistry::allocate_transfer)
    /// resolve to a transfer.
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Return the inner numeric value.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}
