pub mod consensus;
pub mod error;
pub mod kv_servers;
pub mod operations;
pub mod saves;
pub(crate) mod state_machine;

pub use error::{KvError, Status};
