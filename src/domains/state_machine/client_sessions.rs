use crate::make_smart_pointer;
use std::collections::HashMap;

/// Highest applied sequence number per client.
#[derive(Debug, Default, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub(crate) struct ClientSessions(HashMap<i64, u64>);
make_smart_pointer!(ClientSessions, HashMap<i64, u64>);

impl ClientSessions {
    pub(crate) fn is_processed(&self, client_id: i64, seq: u64) -> bool {
        self.get(&client_id).is_some_and(|applied| *applied >= seq)
    }

    pub(crate) fn set_processed(&mut self, client_id: i64, seq: u64) {
        let applied = self.entry(client_id).or_default();
        *applied = (*applied).max(seq);
    }
}

#[test]
fn test_unknown_client_is_never_processed() {
    //GIVEN
    let sessions = ClientSessions::default();

    //THEN
    assert!(!sessions.is_processed(42, 1));
}

#[test]
fn test_sequences_at_or_below_applied_are_processed() {
    //GIVEN
    let mut sessions = ClientSessions::default();

    //WHEN
    sessions.set_processed(42, 5);

    //THEN
    assert!(sessions.is_processed(42, 4));
    assert!(sessions.is_processed(42, 5));
    assert!(!sessions.is_processed(42, 6));
    assert!(!sessions.is_processed(43, 1));
}

#[test]
fn test_set_processed_never_moves_backwards() {
    //GIVEN
    let mut sessions = ClientSessions::default();
    sessions.set_processed(1, 9);

    //WHEN
    sessions.set_processed(1, 3);

    //THEN
    assert_eq!(sessions.get(&1), Some(&9));
}
