use crate::domains::consensus::TConsensus;
use crate::domains::error::Status;
use crate::domains::kv_servers::{GetArgs, KvServer, PutAppendArgs, WriteKind};
use std::time::Duration;
use tracing::{debug, instrument};

pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Issues one request at a time against a replica group, retrying until some leader commits it.
pub struct Clerk<C: TConsensus> {
    servers: Vec<KvServer<C>>,
    client_id: i64,
    seq: u64,
    leader_hint: usize,
}

impl<C: TConsensus> Clerk<C> {
    pub fn new(servers: Vec<KvServer<C>>) -> Self {
        Self { servers, client_id: rand::random_range(0..1i64 << 62), seq: 0, leader_hint: 0 }
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Empty string for an absent key.
    #[instrument(level = tracing::Level::DEBUG, skip(self), fields(client_id = self.client_id))]
    pub async fn get(&mut self, key: &str) -> String {
        let args = GetArgs { key: key.to_string(), client_id: self.client_id, seq: self.next_seq() };

        loop {
            for offset in 0..self.servers.len() {
                let i = (self.leader_hint + offset) % self.servers.len();
                let reply = self.servers[i].get(args.clone()).await;
                match reply.status {
                    | Status::Ok | Status::NoSuchKey => {
                        self.leader_hint = i;
                        return reply.value;
                    },
                    | status => debug!(server = i, ?status, "get rejected"),
                }
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    pub async fn put(&mut self, key: &str, value: &str) {
        self.put_append(WriteKind::Put, key, value).await
    }

    pub async fn append(&mut self, key: &str, value: &str) {
        self.put_append(WriteKind::Append, key, value).await
    }

    #[instrument(level = tracing::Level::DEBUG, skip(self, value), fields(client_id = self.client_id))]
    async fn put_append(&mut self, kind: WriteKind, key: &str, value: &str) {
        let args = PutAppendArgs {
            kind,
            key: key.to_string(),
            value: value.to_string(),
            client_id: self.client_id,
            seq: self.next_seq(),
        };

        loop {
            for offset in 0..self.servers.len() {
                let i = (self.leader_hint + offset) % self.servers.len();
                let reply = self.servers[i].put_append(args.clone()).await;
                if reply.status.is_ok() {
                    self.leader_hint = i;
                    return;
                }
                debug!(server = i, status = ?reply.status, "{kind:?} rejected");
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::consensus::{LocalCluster, LocalConsensus};
    use crate::config::KvConfig;

    fn start_cluster(n: usize) -> (LocalCluster, Vec<KvServer<LocalConsensus>>) {
        let cluster = LocalCluster::new(n);
        let servers = (0..n)
            .map(|id| {
                let (consensus, stream) = cluster.connect(id);
                KvServer::start(consensus, stream, KvConfig::default())
            })
            .collect();
        (cluster, servers)
    }

    #[tokio::test]
    async fn test_seq_starts_at_one_and_increases() {
        //GIVEN
        let (_cluster, servers) = start_cluster(1);
        let mut clerk = Clerk::new(servers);

        //WHEN
        clerk.put("a", "1").await;
        clerk.append("a", "2").await;

        //THEN
        assert_eq!(clerk.seq, 2);
        assert_eq!(clerk.get("a").await, "12");
        assert_eq!(clerk.seq, 3);
    }

    #[tokio::test]
    async fn test_get_absent_key_returns_empty_string() {
        let (_cluster, servers) = start_cluster(3);
        let mut clerk = Clerk::new(servers);
        assert_eq!(clerk.get("missing").await, "");
    }

    #[tokio::test]
    async fn test_leader_hint_follows_new_leader() {
        //GIVEN
        let (cluster, servers) = start_cluster(3);
        let mut clerk = Clerk::new(servers);
        clerk.put("k", "v").await;
        assert_eq!(clerk.leader_hint, 0);

        //WHEN
        cluster.elect(2);
        clerk.put("k", "w").await;

        //THEN
        assert_eq!(clerk.leader_hint, 2);
        assert_eq!(clerk.get("k").await, "w");
    }

    #[test]
    fn test_client_id_fits_in_62_bits() {
        let clerk: Clerk<LocalConsensus> = Clerk::new(vec![]);
        assert!((0..1i64 << 62).contains(&clerk.client_id()));
    }
}
