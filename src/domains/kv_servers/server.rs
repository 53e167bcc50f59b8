use crate::config::KvConfig;
use crate::domains::consensus::{CommitStream, StartOutcome, TConsensus};
use crate::domains::error::KvError;
use crate::domains::operations::Operation;
use crate::domains::saves::snapshot::StateSnapshot;
use crate::domains::saves::{TSnapshotPolicy, ThresholdPolicy};
use crate::domains::state_machine::{Registration, ServerState};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// A replica of the key-value service.
/// Cloning is cheap; every clone talks to the same state and apply loop.
pub struct KvServer<C> {
    pub(crate) inner: Arc<KvServerInner<C>>,
    apply_task: Arc<JoinHandle<()>>,
}

pub(crate) struct KvServerInner<C> {
    pub(crate) state: Mutex<ServerState>,
    pub(crate) consensus: C,
    pub(crate) snapshot_policy: Box<dyn TSnapshotPolicy>,
    pub(crate) request_timeout: Duration,
}

impl<C> Clone for KvServer<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), apply_task: self.apply_task.clone() }
    }
}

impl<C: TConsensus> KvServer<C> {
    pub fn start(consensus: C, commit_stream: CommitStream, config: KvConfig) -> Self {
        let policy = ThresholdPolicy::from(&config);
        Self::start_with_policy(consensus, commit_stream, config, policy)
    }

    /// Restores state from the consensus layer's persisted snapshot, then spawns the apply loop.
    pub fn start_with_policy(
        consensus: C,
        commit_stream: CommitStream,
        config: KvConfig,
        snapshot_policy: impl TSnapshotPolicy,
    ) -> Self {
        let mut state = ServerState::default();
        if let Some(data) = consensus.read_snapshot() {
            match StateSnapshot::decode(&data) {
                | Ok(snapshot) => state.restore(snapshot.store, snapshot.sessions),
                | Err(err) => error!("starting empty, persisted snapshot unreadable: {err}"),
            }
        }

        let inner = Arc::new(KvServerInner {
            state: Mutex::new(state),
            consensus,
            snapshot_policy: Box::new(snapshot_policy),
            request_timeout: config.request_timeout,
        });
        let apply_task = tokio::spawn(inner.clone().handle(commit_stream));

        Self { inner, apply_task: Arc::new(apply_task) }
    }

    /// Orders `op` through consensus and waits until it commits at the index it was given.
    ///
    /// - `Ok` if this exact operation committed there, or its (client id, seq) was already applied.
    /// - `NotLeader` if this replica cannot order requests, or a different operation took the index.
    /// - `Timeout` if nothing arrived in time. The operation may still commit later.
    #[instrument(level = tracing::Level::DEBUG, skip(self, op), fields(op = %op))]
    pub(crate) async fn submit(&self, op: Operation) -> Result<(), KvError> {
        let (index, _registration, awaiter) = {
            let mut state = self.inner.state.lock();
            if state.sessions.is_processed(op.client_id, op.seq) {
                return Ok(());
            }

            let StartOutcome::Accepted { index, term } = self.inner.consensus.start(&op) else {
                debug!("rejected, not leader");
                return Err(KvError::NotLeader);
            };
            debug!(index, term, "accepted");

            // registered before the lock is released so the apply loop cannot miss us
            let (ticket, awaiter) = state.dispatch.register(index);
            (index, Registration::new(&self.inner.state, index, ticket), awaiter)
        };

        match tokio::time::timeout(self.inner.request_timeout, awaiter.recv()).await {
            | Ok(Ok(committed)) if committed == op => Ok(()),
            | Ok(Ok(committed)) => {
                info!(index, %committed, "index taken by another operation");
                Err(KvError::NotLeader)
            },
            | Ok(Err(_)) => {
                debug!(index, "waiter released before commit");
                Err(KvError::NotLeader)
            },
            | Err(_) => {
                warn!(index, "timed out waiting for commit");
                Err(KvError::Timeout)
            },
        }
    }

    /// Stops the apply loop. Pending submitters run into their timeout.
    pub fn kill(&self) {
        self.apply_task.abort();
    }

    pub fn is_killed(&self) -> bool {
        self.apply_task.is_finished()
    }
}
