//! Send-side registry of in-flight outbound transfers.
//!
//! [`SendRegistry`] tracks every outbound fragmented transfer on one logical
//! connection so that the transport's per-sub-message completion reports can
//! be correlated back to transfer-level completion, and manages the 1-byte
//! transfer-ID namespace those fragments are labelled with on the wire.
//!
//! Bookkeeping mismatches (unknown keys, sub-messages missing from their
//! transfer, double frees) indicate a bug in the collaborator, not a
//! recoverable wire condition; they are logged and absorbed so one bad
//! report never takes down the other transfers on the connection.

use std::collections::HashMap;

use log::{debug, warn};

use super::{IdAllocError, TransferId, TransferKey};

/// One outbound transfer-in-progress.
///
/// `M` is the collaborator's opaque sub-message handle type: whatever value
/// the transport uses to identify an individual queued fragment message
/// (a sequence number, an arena index). The registry only stores and
/// compares handles; it never interprets them.
#[derive(Debug)]
pub struct OutboundTransfer<M> {
    id: Option<TransferId>,
    total_fragments: u32,
    fragments: Vec<M>,
}

impl<M> OutboundTransfer<M> {
    fn new() -> Self {
        Self {
            id: None,
            total_fragments: 0,
            fragments: Vec::new(),
        }
    }

    /// Wire ID of the transfer, `None` until allocation succeeds.
    #[must_use]
    pub const fn id(&self) -> Option<TransferId> { self.id }

    /// Declared number of fragments this transfer splits into, zero until
    /// declared.
    #[must_use]
    pub const fn total_fragments(&self) -> u32 { self.total_fragments }

    /// Sub-message handles still in flight, in submission order.
    #[must_use]
    pub fn fragments(&self) -> &[M] { self.fragments.as_slice() }

    /// Number of sub-messages still in flight.
    #[must_use]
    pub fn fragment_count(&self) -> usize { self.fragments.len() }
}

/// Registry of in-flight outbound transfers for one logical connection.
///
/// Transfers are value-owned and addressed by [`TransferKey`], a monotonic
/// handle that is never reused. A transfer leaves the registry exactly when
/// its last in-flight sub-message is removed, or when the collaborator frees
/// it explicitly.
///
/// # Examples
///
/// ```
/// use fraglink::SendRegistry;
///
/// let mut registry: SendRegistry<u32> = SendRegistry::new();
/// let key = registry.allocate_transfer();
/// let id = registry.allocate_transfer_id(key).expect("namespace is empty");
/// assert_eq!(id.get(), 0);
///
/// registry.add_fragment(key, 17);
/// registry.remove_fragment(key, &17);
/// assert!(registry.transfer(key).is_none()); // drained, so freed
/// ```
#[derive(Debug)]
pub struct SendRegistry<M> {
    transfers: HashMap<TransferKey, OutboundTransfer<M>>,
    next_key: u64,
}

impl<M> Default for SendRegistry<M> {
    fn default() -> Self { Self::new() }
}

impl<M> SendRegistry<M> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transfers: HashMap::new(),
            next_key: 0,
        }
    }

    /// Create a new empty transfer with no ID and no fragments.
    ///
    /// Always succeeds; ID allocation is a separate, later step performed
    /// once the sender is ready to transmit.
    pub fn allocate_transfer(&mut self) -> TransferKey {
        let key = TransferKey::new(self.next_key);
        self.next_key += 1;
        self.transfers.insert(key, OutboundTransfer::new());
        debug!("allocated outbound transfer {key}");
        key
    }

    /// Record the declared fragment count for `key`.
    ///
    /// Logs and does nothing when `key` is not live.
    pub fn set_total_fragments(&mut self, key: TransferKey, total_fragments: u32) {
        let Some(transfer) = self.transfers.get_mut(&key) else {
            warn!("set_total_fragments: no live transfer for key {key}");
            return;
        };
        transfer.total_fragments = total_fragments;
    }

    /// Append an in-flight sub-message handle to the transfer.
    ///
    /// The caller keeps `key` next to its copy of the handle so the
    /// transport's later completion report can be routed back here via
    /// [`remove_fragment`](Self::remove_fragment). Logs and drops the handle
    /// when `key` is not live.
    pub fn add_fragment(&mut self, key: TransferKey, handle: M) {
        let Some(transfer) = self.transfers.get_mut(&key) else {
            warn!("add_fragment: no live transfer for key {key}, dropping sub-message handle");
            return;
        };
        transfer.fragments.push(handle);
    }

    /// Allocate the smallest unused wire ID in [0, 255] for the transfer.
    ///
    /// Smallest-available selection keeps the wire convention of the
    /// original protocol; with single-digit transfer counts per connection
    /// the scan cost is immaterial.
    ///
    /// # Errors
    ///
    /// Returns [`IdAllocError::UnknownTransfer`] when `key` is not live,
    /// [`IdAllocError::AlreadyAssigned`] when the transfer already holds an
    /// ID, and [`IdAllocError::Exhausted`] when all 256 values are in use.
    /// On error the transfer's ID is left unchanged.
    pub fn allocate_transfer_id(&mut self, key: TransferKey) -> Result<TransferId, IdAllocError> {
        let transfer = self
            .transfers
            .get(&key)
            .ok_or(IdAllocError::UnknownTransfer { key })?;
        if let Some(id) = transfer.id {
            return Err(IdAllocError::AlreadyAssigned { key, id });
        }

        let mut live = [false; 256];
        for transfer in self.transfers.values() {
            if let Some(id) = transfer.id {
                live[usize::from(id.get())] = true;
            }
        }
        let free = live
            .iter()
            .position(|used| !used)
            .and_then(|slot| u8::try_from(slot).ok())
            .ok_or(IdAllocError::Exhausted)?;

        let id = TransferId::new(free);
        if let Some(transfer) = self.transfers.get_mut(&key) {
            transfer.id = Some(id);
        }
        debug!("allocated transfer id {id} to transfer {key}");
        Ok(id)
    }

    /// Remove a completed sub-message handle from the transfer.
    ///
    /// Invoked when the transport reports the sub-message finished (sent,
    /// acknowledged, or failed). When the removal drains the transfer's
    /// fragment list, the transfer is freed immediately. Logs when the key
    /// or handle is unknown.
    pub fn remove_fragment(&mut self, key: TransferKey, handle: &M)
    where
        M: PartialEq,
    {
        let Some(transfer) = self.transfers.get_mut(&key) else {
            warn!("remove_fragment: no live transfer for key {key}");
            return;
        };
        let Some(position) = transfer.fragments.iter().position(|f| f == handle) else {
            warn!("remove_fragment: sub-message not found in transfer {key}");
            return;
        };
        transfer.fragments.remove(position);
        if transfer.fragments.is_empty() {
            self.transfers.remove(&key);
            debug!("transfer {key} drained its last fragment, freeing it");
        }
    }

    /// Remove and destroy the transfer.
    ///
    /// Logs when `key` is not live (double-free guard).
    pub fn free_transfer(&mut self, key: TransferKey) {
        if self.transfers.remove(&key).is_none() {
            warn!("free_transfer: no live transfer for key {key}");
        }
    }

    /// Look up a live transfer.
    #[must_use]
    pub fn transfer(&self, key: TransferKey) -> Option<&OutboundTransfer<M>> {
        self.transfers.get(&key)
    }

    /// Number of live transfers.
    #[must_use]
    pub fn len(&self) -> usize { self.transfers.len() }

    /// Whether no transfers are live.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.transfers.is_empty() }
}
