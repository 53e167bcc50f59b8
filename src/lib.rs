pub mod adapters;
pub mod config;
pub mod domains;
pub mod macros;
pub mod presentation;
mod types;

pub use adapters::consensus::{LocalCluster, LocalConsensus};
pub use config::{Environment, KvConfig};
pub use domains::kv_servers::KvServer;
pub use presentation::clients::Clerk;

pub mod prelude {
    pub use crate::domains::consensus::{ApplyMsg, CommitStream, StartOutcome, TConsensus};
    pub use crate::domains::error::{KvError, Status};
    pub use crate::domains::kv_servers::{GetArgs, GetReply, PutAppendArgs, PutAppendReply, WriteKind};
    pub use crate::domains::operations::{OpKind, Operation};
    pub use crate::domains::saves::{TSnapshotPolicy, ThresholdPolicy};
    pub use bytes;
    pub use tokio;
}
