//! An in-process stand-in for the log-replication layer.
//!
//! It does not run a consensus protocol. Replicas share one log; an entry commits as soon as
//! the leader and a majority of replicas are connected, and committed entries are pushed, in
//! order, to every connected replica. Partitions, crashes and leader changes are driven
//! explicitly by the owner of the [`LocalCluster`].
use crate::domains::consensus::{ApplyMsg, CommitSender, CommitStream, StartOutcome, TConsensus};
use crate::domains::operations::Operation;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct LocalCluster(Arc<Mutex<ClusterState>>);

/// Handle of one replica onto the shared [`LocalCluster`].
pub struct LocalConsensus {
    id: usize,
    generation: u64,
    cluster: LocalCluster,
}

struct ClusterState {
    term: u64,
    leader: usize,
    // entries after `compacted_upto`, in index order
    log: Vec<LogEntry>,
    compacted_upto: u64,
    commit_index: u64,
    compaction_snapshot: Option<PersistedSnapshot>,
    replicas: Vec<Replica>,
}

#[derive(Debug, Clone)]
struct LogEntry {
    index: u64,
    term: u64,
    op: Operation,
    size: usize,
}

#[derive(Debug, Clone)]
struct PersistedSnapshot {
    index: u64,
    data: Bytes,
}

#[derive(Default)]
struct Replica {
    generation: u64,
    commit_tx: Option<CommitSender>,
    connected: bool,
    delivered: u64,
    snapshot: Option<PersistedSnapshot>,
}

impl LocalCluster {
    /// Replica 0 leads term 1. No replica is running until [`LocalCluster::connect`].
    pub fn new(replica_count: usize) -> Self {
        let replicas = (0..replica_count).map(|_| Replica::default()).collect();
        Self(Arc::new(Mutex::new(ClusterState {
            term: 1,
            leader: 0,
            log: Vec::new(),
            compacted_upto: 0,
            commit_index: 0,
            compaction_snapshot: None,
            replicas,
        })))
    }

    /// (Re)starts replica `id`. Delivery resumes right after its persisted snapshot.
    pub fn connect(&self, id: usize) -> (LocalConsensus, CommitStream) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = self.0.lock();

        let replica = &mut state.replicas[id];
        replica.generation += 1;
        replica.commit_tx = Some(tx);
        replica.connected = true;
        replica.delivered = replica.snapshot.as_ref().map_or(0, |s| s.index);
        let generation = replica.generation;
        info!(id, generation, "replica connected");

        state.advance_commit();
        (LocalConsensus { id, generation, cluster: self.clone() }, rx)
    }

    pub fn disconnect(&self, id: usize) {
        self.0.lock().replicas[id].connected = false;
        debug!(id, "replica partitioned");
    }

    pub fn reconnect(&self, id: usize) {
        let mut state = self.0.lock();
        state.replicas[id].connected = true;
        debug!(id, "replica healed");
        state.advance_commit();
    }

    /// Closes the replica's commit stream. Its persisted snapshot survives for the next connect.
    pub fn crash(&self, id: usize) {
        let mut state = self.0.lock();
        let replica = &mut state.replicas[id];
        replica.commit_tx = None;
        replica.connected = false;
        info!(id, "replica crashed");
    }

    /// Starts a new term led by `id`. Entries the old leader never committed are discarded.
    pub fn elect(&self, id: usize) {
        let mut state = self.0.lock();
        state.term += 1;
        state.leader = id;

        let committed = (state.commit_index - state.compacted_upto) as usize;
        state.log.truncate(committed);
        info!(id, term = state.term, "leader elected");
        state.advance_commit();
    }

    pub fn leader(&self) -> usize {
        self.0.lock().leader
    }

    pub fn term(&self) -> u64 {
        self.0.lock().term
    }

    pub fn commit_index(&self) -> u64 {
        self.0.lock().commit_index
    }

    pub fn last_log_index(&self) -> u64 {
        self.0.lock().last_index()
    }

    /// Smallest index still held in the shared log.
    pub fn log_start_index(&self) -> u64 {
        self.0.lock().compacted_upto + 1
    }

    pub fn replica_count(&self) -> usize {
        self.0.lock().replicas.len()
    }
}

impl ClusterState {
    fn last_index(&self) -> u64 {
        self.compacted_upto + self.log.len() as u64
    }

    fn entry(&self, index: u64) -> Option<&LogEntry> {
        if index <= self.compacted_upto {
            return None;
        }
        self.log.get((index - self.compacted_upto - 1) as usize)
    }

    fn is_live(&self, id: usize, generation: u64) -> bool {
        let replica = &self.replicas[id];
        replica.generation == generation && replica.commit_tx.is_some()
    }

    fn has_quorum(&self) -> bool {
        let connected = self.replicas.iter().filter(|r| r.connected && r.commit_tx.is_some()).count();
        self.replicas[self.leader].connected && connected * 2 > self.replicas.len()
    }

    fn advance_commit(&mut self) {
        if self.has_quorum() {
            self.commit_index = self.last_index();
        }
        for id in 0..self.replicas.len() {
            self.deliver(id);
        }
    }

    fn deliver(&mut self, id: usize) {
        let commit_index = self.commit_index;
        let compacted_upto = self.compacted_upto;
        let compaction_snapshot = self.compaction_snapshot.clone();

        let replica = &mut self.replicas[id];
        if !replica.connected {
            return;
        }
        let Some(tx) = replica.commit_tx.clone() else { return };

        if replica.delivered < compacted_upto {
            if let Some(snapshot) = compaction_snapshot {
                debug!(id, index = snapshot.index, "sending snapshot to lagging replica");
                let msg = ApplyMsg::Snapshot { index: snapshot.index, data: snapshot.data.clone() };
                if tx.send(msg).is_err() {
                    replica.commit_tx = None;
                    return;
                }
                replica.delivered = snapshot.index;
                replica.snapshot = Some(snapshot);
            }
        }

        while self.replicas[id].delivered < commit_index {
            let index = self.replicas[id].delivered + 1;
            let Some(entry) = self.entry(index).cloned() else { break };
            let replica = &mut self.replicas[id];
            if tx.send(ApplyMsg::Command { index, op: entry.op }).is_err() {
                replica.commit_tx = None;
                return;
            }
            replica.delivered = index;
        }
    }

    fn replicated_size(&self, id: usize) -> usize {
        let since = self.replicas[id].snapshot.as_ref().map_or(0, |s| s.index);
        self.log.iter().filter(|e| e.index > since).map(|e| e.size).sum()
    }

    fn save_snapshot(&mut self, id: usize, index: u64, data: Bytes) {
        let replica = &mut self.replicas[id];
        if replica.snapshot.as_ref().is_some_and(|s| s.index >= index) {
            return;
        }
        let snapshot = PersistedSnapshot { index, data };
        replica.snapshot = Some(snapshot.clone());

        if id == self.leader && index > self.compacted_upto && index <= self.commit_index {
            let drained = (index - self.compacted_upto) as usize;
            self.log.drain(..drained);
            self.compacted_upto = index;
            self.compaction_snapshot = Some(snapshot);
            debug!(index, "log compacted");
        }
    }
}

impl TConsensus for LocalConsensus {
    fn start(&self, op: &Operation) -> StartOutcome {
        let mut state = self.cluster.0.lock();
        if state.leader != self.id || !state.is_live(self.id, self.generation) {
            return StartOutcome::NotLeader;
        }

        let index = state.last_index() + 1;
        let term = state.term;
        state.log.push(LogEntry { index, term, op: op.clone(), size: op.encoded_len() });
        state.advance_commit();
        StartOutcome::Accepted { index, term }
    }

    fn replicated_size(&self) -> usize {
        self.cluster.0.lock().replicated_size(self.id)
    }

    fn save_snapshot(&self, index: u64, snapshot: Bytes) {
        let mut state = self.cluster.0.lock();
        if state.replicas[self.id].generation != self.generation {
            return;
        }
        state.save_snapshot(self.id, index, snapshot);
    }

    fn read_snapshot(&self) -> Option<Bytes> {
        let state = self.cluster.0.lock();
        state.replicas[self.id].snapshot.as_ref().map(|s| s.data.clone())
    }
}
