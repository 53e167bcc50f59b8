use super::StartOutcome;
use crate::domains::operations::Operation;
use bytes::Bytes;

/// Log-replication layer the key-value server is built on.
/// Committed entries reach the server through a separate [`super::CommitStream`].
pub trait TConsensus: Send + Sync + 'static {
    /// Asks to order `op`. Returns immediately; acceptance does not imply the entry will commit.
    fn start(&self, op: &Operation) -> StartOutcome;

    /// Bytes of replicated log retained since the last snapshot.
    fn replicated_size(&self) -> usize;

    /// Persists `snapshot` as the authoritative state as of `index`, allowing the log
    /// before it to be discarded.
    fn save_snapshot(&self, index: u64, snapshot: Bytes);

    /// Last snapshot persisted for this replica, if any.
    fn read_snapshot(&self) -> Option<Bytes>;
}
