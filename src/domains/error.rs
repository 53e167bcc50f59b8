use thiserror::Error;

/// Outcome of a request that did not succeed. Every variant is safe to retry:
/// the (client id, seq) pair makes a resubmission idempotent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvError {
    #[error("NotLeader")]
    NotLeader,
    #[error("Timeout")]
    Timeout,
    #[error("NoSuchKey")]
    NoSuchKey,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("snapshot has {remaining} trailing bytes")]
    TrailingBytes { remaining: usize },
}

/// Status reported back to callers of the request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bincode::Encode, bincode::Decode)]
pub enum Status {
    #[default]
    Ok,
    NoSuchKey,
    NotLeader,
    Timeout,
}

impl From<KvError> for Status {
    fn from(value: KvError) -> Self {
        match value {
            | KvError::NotLeader => Status::NotLeader,
            | KvError::Timeout => Status::Timeout,
            | KvError::NoSuchKey => Status::NoSuchKey,
        }
    }
}

impl Status {
    pub fn is_ok(&self) -> bool {
        *self == Status::Ok
    }
}
