use super::KvServer;
use crate::domains::consensus::TConsensus;
use crate::domains::error::Status;
use crate::domains::operations::Operation;

#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct GetArgs {
    pub key: String,
    pub client_id: i64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, bincode::Encode, bincode::Decode)]
pub struct GetReply {
    pub value: String,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum WriteKind {
    Put,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct PutAppendArgs {
    pub kind: WriteKind,
    pub key: String,
    pub value: String,
    pub client_id: i64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, bincode::Encode, bincode::Decode)]
pub struct PutAppendReply {
    pub status: Status,
}

impl<C: TConsensus> KvServer<C> {
    /// The value is read after the Get commits, so a write committed in between is visible.
    pub async fn get(&self, args: GetArgs) -> GetReply {
        let op = Operation::get(args.key.clone(), args.client_id, args.seq);
        if let Err(err) = self.submit(op).await {
            return GetReply { value: String::new(), status: err.into() };
        }

        match self.inner.state.lock().store.get(&args.key) {
            | Some(value) => GetReply { value: value.clone(), status: Status::Ok },
            | None => GetReply { value: String::new(), status: Status::NoSuchKey },
        }
    }

    pub async fn put_append(&self, args: PutAppendArgs) -> PutAppendReply {
        let op = match args.kind {
            | WriteKind::Put => Operation::put(args.key, args.value, args.client_id, args.seq),
            | WriteKind::Append => Operation::append(args.key, args.value, args.client_id, args.seq),
        };

        match self.submit(op).await {
            | Ok(()) => PutAppendReply { status: Status::Ok },
            | Err(err) => PutAppendReply { status: err.into() },
        }
    }
}
