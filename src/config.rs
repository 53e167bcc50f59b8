use crate::env_var;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_SNAPSHOT_SCALE: usize = 10;

/// Knobs of a single key-value server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvConfig {
    /// Replicated log size that triggers a snapshot. `None` disables snapshotting.
    pub max_raft_state: Option<usize>,
    /// How long a submitter waits for its index to commit.
    pub request_timeout: Duration,
    pub snapshot_scale: usize,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            max_raft_state: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            snapshot_scale: DEFAULT_SNAPSHOT_SCALE,
        }
    }
}

impl KvConfig {
    pub fn set_max_raft_state(mut self, max_raft_state: usize) -> Self {
        self.max_raft_state = Some(max_raft_state);
        self
    }

    pub fn set_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

pub struct Environment {
    pub replicas: usize,
    pub max_raft_state: i64,
    pub request_timeout_mills: u64,
    pub log_level: tracing::Level,
}

impl Environment {
    pub fn init() -> Self {
        env_var!(
            defaults: {
                replicas: usize = 3,
                max_raft_state: i64 = -1,
                request_timeout_mills: u64 = DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
                log_level: tracing::Level = tracing::Level::INFO,
            },
            optional: {}
        );

        Self { replicas, max_raft_state, request_timeout_mills, log_level }
    }

    pub fn kv_config(&self) -> KvConfig {
        KvConfig {
            // negative means no limit
            max_raft_state: usize::try_from(self.max_raft_state).ok(),
            request_timeout: Duration::from_millis(self.request_timeout_mills),
            snapshot_scale: DEFAULT_SNAPSHOT_SCALE,
        }
    }
}

#[test]
fn test_negative_max_raft_state_disables_snapshots() {
    //GIVEN
    let env = Environment {
        replicas: 3,
        max_raft_state: -1,
        request_timeout_mills: 500,
        log_level: tracing::Level::INFO,
    };

    //WHEN
    let config = env.kv_config();

    //THEN
    assert_eq!(config.max_raft_state, None);
    assert_eq!(config.request_timeout, Duration::from_millis(500));
}

#[test]
fn test_positive_max_raft_state_is_kept() {
    let env = Environment {
        replicas: 5,
        max_raft_state: 1000,
        request_timeout_mills: 2000,
        log_level: tracing::Level::DEBUG,
    };
    assert_eq!(env.kv_config().max_raft_state, Some(1000));
}
