mod apply_loop;
pub mod handlers;
mod server;

pub use handlers::{GetArgs, GetReply, PutAppendArgs, PutAppendReply, WriteKind};
pub use server::KvServer;
