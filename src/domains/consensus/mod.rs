pub mod interfaces;

use crate::domains::operations::Operation;
use bytes::Bytes;

pub use interfaces::TConsensus;

pub type CommitSender = tokio::sync::mpsc::UnboundedSender<ApplyMsg>;
pub type CommitStream = tokio::sync::mpsc::UnboundedReceiver<ApplyMsg>;

/// One item of the ordered commit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyMsg {
    /// Committed at `index`. Indices of consecutive commands strictly increase with no gaps.
    Command { index: u64, op: Operation },
    /// Replaces the entire local state with the state as of `index`.
    Snapshot { index: u64, data: Bytes },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Accepted { index: u64, term: u64 },
    NotLeader,
}
