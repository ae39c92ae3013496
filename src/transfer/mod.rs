//! Domain types for fragmented message transfer.
//!
//! This module collects the building blocks used by both directions of a
//! fragmented transfer. Each sub-module focuses on a single concept to keep
//! the code small and easy to audit while still presenting a cohesive API at
//! the crate root.

pub mod error;
pub mod header;
pub mod id;
pub mod index;
pub mod receive;
pub mod send;
pub mod split;

pub use error::{IdAllocError, SplitError};
pub use header::{ContinuationHeader, StartHeader};
pub use id::{TransferId, TransferKey};
pub use index::FragmentIndex;
pub use receive::ReassemblyBuffer;
pub use send::{OutboundTransfer, SendRegistry};
pub use split::{FragmentRun, Splitter};
