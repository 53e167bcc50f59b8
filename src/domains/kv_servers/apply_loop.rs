use super::server::KvServerInner;
use crate::domains::consensus::{ApplyMsg, CommitStream, TConsensus};
use crate::domains::operations::Operation;
use crate::domains::saves::snapshot::StateSnapshot;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

impl<C: TConsensus> KvServerInner<C> {
    /// Sole consumer of the commit stream. Runs until the stream closes.
    pub(crate) async fn handle(self: Arc<Self>, mut commit_stream: CommitStream) {
        while let Some(msg) = commit_stream.recv().await {
            match msg {
                | ApplyMsg::Command { index, op } => self.apply_command(index, op),
                | ApplyMsg::Snapshot { index, data } => self.install_snapshot(index, &data),
            }
        }
        info!("commit stream closed, apply loop exiting");
    }

    pub(crate) fn apply_command(&self, index: u64, op: Operation) {
        let callback = {
            let mut state = self.state.lock();
            if index <= state.last_applied {
                debug!(index, last_applied = state.last_applied, "ignoring stale command");
                return;
            }
            state.last_applied = index;

            if !state.apply(&op) {
                debug!(index, %op, "already applied, skipping mutation");
            }
            state.dispatch.take(index)
        };

        // lock released: a slow or vanished submitter cannot stall the loop
        if let Some(callback) = callback {
            callback.send(op);
        }

        if self.snapshot_policy.should_snapshot(self.consensus.replicated_size()) {
            self.save_snapshot(index);
        }
    }

    #[instrument(level = tracing::Level::DEBUG, skip(self))]
    pub(crate) fn save_snapshot(&self, index: u64) {
        let state = self.state.lock();
        match StateSnapshot::encode(&state.store, &state.sessions) {
            | Ok(data) => {
                debug!(bytes = data.len(), "saving snapshot");
                self.consensus.save_snapshot(index, data);
            },
            | Err(err) => error!("{err}"),
        }
    }

    /// Replaces store and sessions wholesale. An undecodable blob leaves the current state alone.
    pub(crate) fn install_snapshot(&self, index: u64, data: &[u8]) {
        let snapshot = match StateSnapshot::decode(data) {
            | Ok(snapshot) => snapshot,
            | Err(err) => {
                error!(index, "discarding snapshot: {err}");
                return;
            },
        };

        let mut state = self.state.lock();
        if index <= state.last_applied {
            debug!(index, last_applied = state.last_applied, "ignoring stale snapshot");
            return;
        }
        state.restore(snapshot.store, snapshot.sessions);
        state.last_applied = index;

        // whatever these were waiting for is folded into the snapshot or lost
        let released = state.dispatch.release_up_to(index);
        info!(index, released, "installed snapshot");
    }
}
