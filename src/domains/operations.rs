use std::fmt::Display;

/// Unit of work ordered through consensus.
/// Two operations are the same request iff every field matches; the server relies on that
/// to tell whether the entry committed at a waited index is the one it submitted.
#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct Operation {
    pub kind: OpKind,
    pub key: String,
    pub value: String,
    pub client_id: i64,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum OpKind {
    Get,
    Put,
    Append,
}

impl Operation {
    pub fn get(key: impl Into<String>, client_id: i64, seq: u64) -> Self {
        Self { kind: OpKind::Get, key: key.into(), value: String::new(), client_id, seq }
    }

    pub fn put(key: impl Into<String>, value: impl Into<String>, client_id: i64, seq: u64) -> Self {
        Self { kind: OpKind::Put, key: key.into(), value: value.into(), client_id, seq }
    }

    pub fn append(
        key: impl Into<String>,
        value: impl Into<String>,
        client_id: i64,
        seq: u64,
    ) -> Self {
        Self { kind: OpKind::Append, key: key.into(), value: value.into(), client_id, seq }
    }

    pub(crate) fn encoded_len(&self) -> usize {
        bincode::encode_to_vec(self, bincode::config::standard()).map(|v| v.len()).unwrap_or(0)
    }
}

impl Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | OpKind::Get => write!(f, "Get"),
            | OpKind::Put => write!(f, "Put"),
            | OpKind::Append => write!(f, "Append"),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) client={} seq={}", self.kind, self.key, self.client_id, self.seq)
    }
}

#[test]
fn test_operations_differing_in_any_field_are_not_equal() {
    //GIVEN
    let op = Operation::put("x", "1", 7, 1);

    //THEN
    assert_eq!(op, Operation::put("x", "1", 7, 1));
    assert_ne!(op, Operation::append("x", "1", 7, 1));
    assert_ne!(op, Operation::put("y", "1", 7, 1));
    assert_ne!(op, Operation::put("x", "2", 7, 1));
    assert_ne!(op, Operation::put("x", "1", 8, 1));
    assert_ne!(op, Operation::put("x", "1", 7, 2));
}
