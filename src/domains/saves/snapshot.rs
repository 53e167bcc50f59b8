use crate::domains::error::SnapshotError;
use crate::domains::state_machine::client_sessions::ClientSessions;
use crate::domains::state_machine::store::KvStore;
use bytes::Bytes;

/// Replicated application state, independent of any log prefix.
/// Encoded as the store followed by the client sessions, nothing else.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct StateSnapshot {
    pub(crate) store: KvStore,
    pub(crate) sessions: ClientSessions,
}

impl StateSnapshot {
    pub(crate) fn encode(store: &KvStore, sessions: &ClientSessions) -> Result<Bytes, SnapshotError> {
        let encoded = bincode::encode_to_vec((store, sessions), bincode::config::standard())?;
        Ok(Bytes::from(encoded))
    }

    /// An empty blob is a fresh start and yields empty state.
    pub(crate) fn decode(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let ((store, sessions), consumed): ((KvStore, ClientSessions), usize) =
            bincode::decode_from_slice(data, bincode::config::standard())?;
        if consumed != data.len() {
            return Err(SnapshotError::TrailingBytes { remaining: data.len() - consumed });
        }
        Ok(Self { store, sessions })
    }
}
