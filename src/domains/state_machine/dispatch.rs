use crate::domains::operations::Operation;
use crate::types::{Callback, CallbackAwaiter};
use std::collections::HashMap;
use tracing::debug;

/// Log index -> the submitter waiting for that index to commit.
#[derive(Debug, Default)]
pub(crate) struct ResultDispatch {
    waiters: HashMap<u64, Waiter>,
    next_ticket: u64,
}

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    callback: Callback<Operation>,
}

impl ResultDispatch {
    /// A previous waiter at the same index is dropped; its awaiter observes a closed channel.
    pub(crate) fn register(&mut self, index: u64) -> (u64, CallbackAwaiter<Operation>) {
        let (callback, awaiter) = Callback::create();
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        if self.waiters.insert(index, Waiter { ticket, callback }).is_some() {
            debug!("superseded waiter at index {index}");
        }
        (ticket, awaiter)
    }

    pub(crate) fn take(&mut self, index: u64) -> Option<Callback<Operation>> {
        self.waiters.remove(&index).map(|waiter| waiter.callback)
    }

    /// Removes the entry at `index` only if it still belongs to `ticket`.
    pub(crate) fn release(&mut self, index: u64, ticket: u64) {
        if self.waiters.get(&index).is_some_and(|waiter| waiter.ticket == ticket) {
            self.waiters.remove(&index);
        }
    }

    pub(crate) fn release_up_to(&mut self, index: u64) -> usize {
        let before = self.waiters.len();
        self.waiters.retain(|waited, _| *waited > index);
        before - self.waiters.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.waiters.len()
    }
}
