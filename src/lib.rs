#![doc(html_root_url = "https://docs.rs/fraglink/latest")]
//! Fragmented message transfer for reliable point-to-point connections.
//!
//! When an application message is too large for a single transport datagram,
//! it travels as an ordered run of fragments sharing a small numeric transfer
//! ID. This crate provides the per-connection state machines for both
//! directions of that exchange: a [`SendRegistry`] that allocates transfer
//! IDs from the 1-byte namespace and tracks in-flight outbound sub-messages,
//! a [`Splitter`] that slices a payload into a wire-ordered fragment run, and
//! a [`ReassemblyBuffer`] that accumulates inbound fragments and yields the
//! concatenated payload once a transfer completes.
//!
//! The underlying transport (delivery, retransmission, congestion control)
//! is a collaborator, not part of this crate: fragments arrive and depart as
//! opaque byte buffers labelled with the identifiers in
//! [`transfer::header`]. Each connection owns one registry/buffer pair and
//! drives it synchronously from its own processing context; the crate uses
//! no locking and spawns nothing.

pub mod transfer;

pub use transfer::{
    ContinuationHeader,
    FragmentIndex,
    FragmentRun,
    IdAllocError,
    OutboundTransfer,
    ReassemblyBuffer,
    SendRegistry,
    SplitError,
    Splitter,
    StartHeader,
    TransferId,
    TransferKey,
};
