pub mod policy;
pub(crate) mod snapshot;

pub use policy::{TSnapshotPolicy, ThresholdPolicy};
