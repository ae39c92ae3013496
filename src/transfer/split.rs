//! Outbound helper that slices an oversized payload into a fragment run.

use std::num::{NonZeroU32, NonZeroUsize};

use super::{ContinuationHeader, FragmentIndex, SplitError, StartHeader, TransferId};

/// One transfer's worth of fragments, in wire order.
///
/// The run pairs the [`StartHeader`] with the index-0 payload and carries
/// the remaining fragments as `(ContinuationHeader, payload)` pairs with
/// strictly ascending indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentRun {
    start: StartHeader,
    start_payload: Vec<u8>,
    continuations: Vec<(ContinuationHeader, Vec<u8>)>,
}

impl FragmentRun {
    /// Return the start unit's header.
    #[must_use]
    pub const fn start(&self) -> StartHeader { self.start }

    /// Return the payload carried by the start unit.
    #[must_use]
    pub fn start_payload(&self) -> &[u8] { self.start_payload.as_slice() }

    /// Return the continuation units in wire order.
    #[must_use]
    pub fn continuations(&self) -> &[(ContinuationHeader, Vec<u8>)] {
        self.continuations.as_slice()
    }

    /// Total number of fragments in the run, start unit included.
    #[must_use]
    pub const fn total_fragments(&self) -> NonZeroU32 { self.start.total_fragments() }

    /// Whether the payload needed more than the start unit alone.
    #[must_use]
    pub fn is_fragmented(&self) -> bool { !self.continuations.is_empty() }

    /// Consume the run, returning its components.
    #[must_use]
    pub fn into_parts(self) -> (StartHeader, Vec<u8>, Vec<(ContinuationHeader, Vec<u8>)>) {
        (self.start, self.start_payload, self.continuations)
    }
}

/// Splits outbound payloads into fragment-sized pieces.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use fraglink::{Splitter, TransferId};
///
/// let splitter = Splitter::new(NonZeroUsize::new(4).expect("non-zero"));
/// let run = splitter
///     .split(TransferId::new(9), b"hello world")
///     .expect("payload is non-empty");
/// assert_eq!(run.total_fragments().get(), 3);
/// assert_eq!(run.start_payload(), b"hell");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Splitter {
    max_fragment_size: NonZeroUsize,
}

impl Splitter {
    /// Create a splitter that caps fragment payloads at `max_fragment_size`
    /// bytes.
    #[must_use]
    pub const fn new(max_fragment_size: NonZeroUsize) -> Self { Self { max_fragment_size } }

    /// Return the maximum fragment payload size in bytes.
    #[must_use]
    pub const fn max_fragment_size(&self) -> NonZeroUsize { self.max_fragment_size }

    /// Slice `payload` into a fragment run tagged with `transfer_id`.
    ///
    /// Every fragment except the last carries exactly
    /// [`max_fragment_size`](Self::max_fragment_size) bytes; the last carries
    /// the remainder.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::EmptyPayload`] for a zero-length payload and
    /// [`SplitError::TooManyFragments`] when the fragment count would not
    /// fit a `u32` index.
    pub fn split(
        &self,
        transfer_id: TransferId,
        payload: &[u8],
    ) -> Result<FragmentRun, SplitError> {
        if payload.is_empty() {
            return Err(SplitError::EmptyPayload);
        }

        let max = self.max_fragment_size.get();
        let required = payload.len().div_ceil(max);
        let total = u32::try_from(required)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(SplitError::TooManyFragments { required })?;

        let mut chunks = payload.chunks(max);
        let start_payload = chunks.next().map(<[u8]>::to_vec).unwrap_or_default();

        let mut continuations = Vec::with_capacity(required - 1);
        let mut index = FragmentIndex::zero();
        for chunk in chunks {
            index = index
                .checked_increment()
                .ok_or(SplitError::TooManyFragments { required })?;
            continuations.push((ContinuationHeader::new(transfer_id, index), chunk.to_vec()));
        }

        Ok(FragmentRun {
            start: StartHeader::new(transfer_id, total),
            start_payload,
            continuations,
        })
    }
}
