pub(crate) mod client_sessions;
pub(crate) mod dispatch;
pub(crate) mod store;

use crate::domains::operations::Operation;
use client_sessions::ClientSessions;
use dispatch::ResultDispatch;
use parking_lot::Mutex;
use store::KvStore;

/// Everything the single server lock guards.
/// Store mutation and the dedup advance happen in the same critical section, so no reader
/// ever sees one without the other.
#[derive(Debug, Default)]
pub(crate) struct ServerState {
    pub(crate) store: KvStore,
    pub(crate) sessions: ClientSessions,
    pub(crate) dispatch: ResultDispatch,
    pub(crate) last_applied: u64,
}

impl ServerState {
    /// Executes `op` at most once per (client id, seq). Returns whether it mutated anything.
    pub(crate) fn apply(&mut self, op: &Operation) -> bool {
        if self.sessions.is_processed(op.client_id, op.seq) {
            return false;
        }
        self.store.execute(op);
        self.sessions.set_processed(op.client_id, op.seq);
        true
    }

    pub(crate) fn restore(&mut self, store: KvStore, sessions: ClientSessions) {
        self.store = store;
        self.sessions = sessions;
    }
}

/// A submitter's slot in [`ResultDispatch`]. Dropping it deregisters the slot,
/// whichever way the submission ends.
pub(crate) struct Registration<'a> {
    state: &'a Mutex<ServerState>,
    index: u64,
    ticket: u64,
}

impl<'a> Registration<'a> {
    pub(crate) fn new(state: &'a Mutex<ServerState>, index: u64, ticket: u64) -> Self {
        Self { state, index, ticket }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.state.lock().dispatch.release(self.index, self.ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replayed_operation_mutates_once() {
        //GIVEN
        let mut state = ServerState::default();
        let op = Operation::append("k", "a", 1, 1);

        //WHEN
        let first = state.apply(&op);
        let second = state.apply(&op);

        //THEN
        assert!(first);
        assert!(!second);
        assert_eq!(state.store.get("k").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_higher_seq_applies_after_lower_one() {
        //GIVEN
        let mut state = ServerState::default();
        state.apply(&Operation::put("k", "1", 1, 1));

        //WHEN
        let applied = state.apply(&Operation::put("k", "5", 1, 5));
        let stale = state.apply(&Operation::put("k", "3", 1, 3));

        //THEN
        assert!(applied);
        assert!(!stale);
        assert_eq!(state.store.get("k").map(String::as_str), Some("5"));
        assert_eq!(state.sessions.get(&1), Some(&5));
    }

    #[test]
    fn test_get_advances_session_without_touching_store() {
        //GIVEN
        let mut state = ServerState::default();

        //WHEN
        state.apply(&Operation::get("k", 2, 1));

        //THEN
        assert!(state.store.is_empty());
        assert!(state.sessions.is_processed(2, 1));
    }

    #[test]
    fn test_dropping_registration_deregisters_waiter() {
        //GIVEN
        let state = Mutex::new(ServerState::default());
        let (ticket, _awaiter) = state.lock().dispatch.register(4);

        //WHEN
        drop(Registration::new(&state, 4, ticket));

        //THEN
        assert_eq!(state.lock().dispatch.len(), 0);
    }
}
