pub mod memory_based;

pub use memory_based::{LocalCluster, LocalConsensus};
