//! Error types surfaced by the transfer layer.
//!
//! Only conditions the caller can act on become `Err` values. Protocol
//! anomalies that the contract defines as log-and-drop (zero-length
//! fragments, unknown transfer IDs, duplicate indices, bookkeeping
//! mismatches) are reported through `log` and absorbed instead, so one bad
//! unit never aborts the other in-flight transfers on the connection.

use thiserror::Error;

use super::{TransferId, TransferKey};

/// Errors produced while allocating a wire transfer ID.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IdAllocError {
    /// Every value in [0, 255] is held by a live transfer. Recoverable: the
    /// caller should back off or fail this one transfer, not the connection.
    #[error("transfer-id namespace exhausted: all 256 ids are live")]
    Exhausted,
    /// The transfer already holds an ID.
    #[error("transfer {key} already holds id {id}")]
    AlreadyAssigned { key: TransferKey, id: TransferId },
    /// The key does not name a live transfer.
    #[error("no live transfer for key {key}")]
    UnknownTransfer { key: TransferKey },
}

/// Errors produced while splitting a payload into fragments.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Zero-length fragments are a protocol error, so an empty payload has
    /// no valid fragment run.
    #[error("refusing to split an empty payload")]
    EmptyPayload,
    /// The payload would need more fragments than the index space can name.
    #[error("payload requires {required} fragments, exceeding the u32 index space")]
    TooManyFragments { required: usize },
}
