//! Receive-side buffer that accumulates fragments into complete transfers.
//!
//! [`ReassemblyBuffer`] tracks possibly-many concurrent inbound transfers
//! keyed by [`TransferId`], detects per-transfer completion, and yields the
//! concatenated payload on demand. Completion is only a signal: the
//! collaborator consumes the assembled payload and then frees the transfer
//! explicitly, so a completed transfer stays queryable until then.
//!
//! Protocol anomalies (zero-length fragments, fragments for transfers never
//! started, duplicate indices) are logged and dropped; reassembly of the
//! other in-flight transfers is never affected. There are no timeouts here:
//! liveness policy belongs to the transport, which frees abandoned transfers
//! through [`ReassemblyBuffer::free`].

use std::{collections::HashMap, num::NonZeroU32};

use log::{debug, warn};

use super::{ContinuationHeader, FragmentIndex, StartHeader, TransferId};

#[derive(Debug)]
struct InboundFragment {
    index: FragmentIndex,
    data: Vec<u8>,
}

#[derive(Debug)]
struct InboundTransfer {
    total_fragments: NonZeroU32,
    fragments: Vec<InboundFragment>,
}

impl InboundTransfer {
    fn new(total_fragments: NonZeroU32) -> Self {
        Self {
            total_fragments,
            fragments: Vec::new(),
        }
    }

    fn has_index(&self, index: FragmentIndex) -> bool {
        self.fragments.iter().any(|f| f.index == index)
    }

    fn is_complete(&self) -> bool { self.fragments.len() >= self.total_fragments.get() as usize }
}

/// Per-connection buffer reassembling inbound fragmented transfers.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU32;
///
/// use fraglink::{ContinuationHeader, FragmentIndex, ReassemblyBuffer, StartHeader, TransferId};
///
/// let id = TransferId::new(5);
/// let mut buffer = ReassemblyBuffer::new();
/// let total = NonZeroU32::new(2).expect("non-zero");
/// assert!(!buffer.start_received(StartHeader::new(id, total), b"he"));
/// assert!(buffer.fragment_received(ContinuationHeader::new(id, FragmentIndex::new(1)), b"llo"));
/// assert_eq!(buffer.assemble(id).as_deref(), Some(b"hello".as_slice()));
/// buffer.free(id);
/// ```
#[derive(Debug, Default)]
pub struct ReassemblyBuffer {
    transfers: HashMap<TransferId, InboundTransfer>,
}

impl ReassemblyBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transfers: HashMap::new(),
        }
    }

    /// Accept the fragment-start unit of a transfer.
    ///
    /// A transfer already tracked under the same ID is discarded entirely
    /// and replaced: the old transfer was abandoned before the collaborator
    /// freed it (a dropped completion signal or a sender restart), and the
    /// new start is authoritative. The payload is stored as fragment 0.
    ///
    /// Returns `true` iff this call completes the transfer, which happens
    /// exactly when the declared total is one fragment.
    pub fn start_received(&mut self, header: StartHeader, payload: &[u8]) -> bool {
        let id = header.transfer_id();
        if payload.is_empty() {
            warn!("discarding zero-length fragment start for transfer {id}");
            return false;
        }

        if self.transfers.remove(&id).is_some() {
            warn!("transfer {id} was already tracked, discarding the stale transfer");
        }
        self.transfers
            .insert(id, InboundTransfer::new(header.total_fragments()));

        self.fragment_received(ContinuationHeader::new(id, FragmentIndex::zero()), payload)
    }

    /// Accept a continuation fragment.
    ///
    /// Returns `true` iff this call causes the transfer to become complete
    /// (the stored fragment count reaches the declared total); `false`
    /// otherwise, including whenever the fragment is rejected. Rejected and
    /// logged: zero-length payloads, fragments for transfers never started,
    /// duplicate indices (the first-received fragment wins), and fragments
    /// arriving after the transfer already completed.
    pub fn fragment_received(&mut self, header: ContinuationHeader, payload: &[u8]) -> bool {
        let id = header.transfer_id();
        let index = header.fragment_index();

        if payload.is_empty() {
            warn!("discarding zero-length fragment {index} for transfer {id}");
            return false;
        }
        let Some(transfer) = self.transfers.get_mut(&id) else {
            warn!(
                "received fragment {index} ({} bytes) for transfer {id}, \
                 which was never started, discarding",
                payload.len(),
            );
            return false;
        };
        if transfer.has_index(index) {
            warn!("duplicate fragment {index} for transfer {id}, keeping the original");
            return false;
        }
        if transfer.is_complete() {
            warn!("fragment {index} arrived for already-complete transfer {id}, discarding");
            return false;
        }

        transfer.fragments.push(InboundFragment {
            index,
            data: payload.to_vec(),
        });

        let complete = transfer.is_complete();
        if complete {
            debug!(
                "transfer {id} completed with {} fragments",
                transfer.fragments.len(),
            );
        }
        complete
    }

    /// Concatenate the transfer's stored fragments into one buffer.
    ///
    /// Fragments are ordered by fragment index, not by arrival, so an
    /// out-of-order delivery still assembles correctly. Returns `None` when
    /// no transfer is tracked under `transfer_id`. Callers normally invoke
    /// this once [`fragment_received`](Self::fragment_received) signals
    /// completion, but a partial assembly of an incomplete transfer is
    /// permitted.
    #[must_use]
    pub fn assemble(&self, transfer_id: TransferId) -> Option<Vec<u8>> {
        let transfer = self.transfers.get(&transfer_id)?;

        let mut ordered: Vec<&InboundFragment> = transfer.fragments.iter().collect();
        ordered.sort_by_key(|f| f.index);

        let total_bytes = ordered.iter().map(|f| f.data.len()).sum();
        let mut assembled = Vec::with_capacity(total_bytes);
        for fragment in ordered {
            assembled.extend_from_slice(&fragment.data);
        }
        Some(assembled)
    }

    /// Remove and destroy the tracked transfer, if present.
    ///
    /// A no-op when `transfer_id` is untracked; callers free defensively.
    pub fn free(&mut self, transfer_id: TransferId) { self.transfers.remove(&transfer_id); }

    /// Whether the transfer is tracked and has reached its declared total.
    #[must_use]
    pub fn is_complete(&self, transfer_id: TransferId) -> bool {
        self.transfers
            .get(&transfer_id)
            .is_some_and(InboundTransfer::is_complete)
    }

    /// Number of fragments stored so far for the transfer.
    #[must_use]
    pub fn fragment_count(&self, transfer_id: TransferId) -> Option<usize> {
        self.transfers.get(&transfer_id).map(|t| t.fragments.len())
    }

    /// Number of transfers currently tracked.
    #[must_use]
    pub fn len(&self) -> usize { self.transfers.len() }

    /// Whether no transfers are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.transfers.is_empty() }
}
