use crate::domains::operations::{OpKind, Operation};
use crate::make_smart_pointer;
use std::collections::HashMap;

/// The externally visible database.
#[derive(Debug, Default, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub(crate) struct KvStore(HashMap<String, String>);
make_smart_pointer!(KvStore, HashMap<String, String>);

impl KvStore {
    pub(crate) fn execute(&mut self, op: &Operation) {
        match op.kind {
            | OpKind::Put => {
                self.insert(op.key.clone(), op.value.clone());
            },
            | OpKind::Append => self.entry(op.key.clone()).or_default().push_str(&op.value),
            | OpKind::Get => {},
        }
    }
}
