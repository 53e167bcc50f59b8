use crate::config::KvConfig;

/// Decides, after each applied command, whether the server should snapshot.
pub trait TSnapshotPolicy: Send + Sync + 'static {
    fn should_snapshot(&self, replicated_size: usize) -> bool;
}

/// Fires once `scale * replicated_size` reaches `max_raft_state`. Never fires without a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub max_raft_state: Option<usize>,
    pub scale: usize,
}

impl ThresholdPolicy {
    pub fn new(max_raft_state: Option<usize>, scale: usize) -> Self {
        Self { max_raft_state, scale }
    }
}

impl From<&KvConfig> for ThresholdPolicy {
    fn from(config: &KvConfig) -> Self {
        Self::new(config.max_raft_state, config.snapshot_scale)
    }
}

impl TSnapshotPolicy for ThresholdPolicy {
    fn should_snapshot(&self, replicated_size: usize) -> bool {
        self.max_raft_state
            .is_some_and(|max| replicated_size.saturating_mul(self.scale) >= max)
    }
}

impl<F> TSnapshotPolicy for F
where
    F: Fn(usize) -> bool + Send + Sync + 'static,
{
    fn should_snapshot(&self, replicated_size: usize) -> bool {
        self(replicated_size)
    }
}

#[test]
fn test_threshold_policy_without_limit_never_fires() {
    let policy = ThresholdPolicy::new(None, 10);
    assert!(!policy.should_snapshot(usize::MAX));
}

#[test]
fn test_threshold_policy_fires_at_scaled_size() {
    //GIVEN
    let policy = ThresholdPolicy::new(Some(1000), 10);

    //THEN
    assert!(!policy.should_snapshot(99));
    assert!(policy.should_snapshot(100));
    assert!(policy.should_snapshot(5000));
}

#[test]
fn test_closure_is_a_policy() {
    let policy = |size: usize| size > 3;
    assert!(policy.should_snapshot(4));
    assert!(!policy.should_snapshot(3));
}
