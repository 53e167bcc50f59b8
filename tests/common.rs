#![allow(dead_code)]

use raftkv::{Clerk, KvConfig, KvServer, LocalCluster, LocalConsensus};
use std::time::Duration;

pub struct TestCluster {
    pub cluster: LocalCluster,
    pub servers: Vec<KvServer<LocalConsensus>>,
    config: KvConfig,
}

impl TestCluster {
    pub fn start(replicas: usize, config: KvConfig) -> Self {
        let cluster = LocalCluster::new(replicas);
        let servers = (0..replicas).map(|id| Self::start_server(&cluster, id, &config)).collect();
        Self { cluster, servers, config }
    }

    fn start_server(cluster: &LocalCluster, id: usize, config: &KvConfig) -> KvServer<LocalConsensus> {
        let (consensus, commit_stream) = cluster.connect(id);
        KvServer::start(consensus, commit_stream, config.clone())
    }

    /// Crashes replica `id` and brings it back from whatever it persisted.
    pub fn restart(&mut self, id: usize) {
        self.cluster.crash(id);
        self.servers[id].kill();
        self.servers[id] = Self::start_server(&self.cluster, id, &self.config);
    }

    pub fn clerk(&self) -> Clerk<LocalConsensus> {
        Clerk::new(self.servers.clone())
    }

    pub fn kill_all(&self) {
        self.servers.iter().for_each(KvServer::kill);
    }
}

pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}
