mod common;
use common::{TestCluster, eventually};
use raftkv::KvConfig;
use raftkv::prelude::*;
use std::time::Duration;

fn put(key: &str, value: &str, client_id: i64, seq: u64) -> PutAppendArgs {
    PutAppendArgs { kind: WriteKind::Put, key: key.into(), value: value.into(), client_id, seq }
}

#[tokio::test]
async fn test_deposed_leader_reports_not_leader_when_its_index_is_overwritten() {
    // GIVEN a leader cut off from the majority with a pending submission
    let cluster = TestCluster::start(3, KvConfig::default());
    cluster.cluster.disconnect(0);
    let old_leader = cluster.servers[0].clone();
    let pending = tokio::spawn(async move { old_leader.put_append(put("k", "stale", 1, 1)).await });
    eventually(|| cluster.cluster.last_log_index() == 1).await;

    // WHEN a new leader commits a different operation at the same index
    cluster.cluster.elect(1);
    let reply = cluster.servers[1].put_append(put("k", "fresh", 2, 1)).await;
    assert_eq!(reply.status, Status::Ok);
    cluster.cluster.reconnect(0);

    // THEN
    let reply = pending.await.unwrap();
    assert_eq!(reply.status, Status::NotLeader);
    let reply = cluster.servers[1].get(GetArgs { key: "k".into(), client_id: 2, seq: 2 }).await;
    assert_eq!(reply.value, "fresh");
}

#[tokio::test]
async fn test_clerk_survives_leader_changes() {
    // GIVEN
    let cluster = TestCluster::start(5, KvConfig::default());
    let mut clerk = cluster.clerk();

    // WHEN
    for leader in 0..5 {
        cluster.cluster.elect(leader);
        clerk.append("k", &leader.to_string()).await;
    }

    // THEN
    assert_eq!(clerk.get("k").await, "01234");
    assert_eq!(cluster.cluster.term(), 6);
}

#[tokio::test]
async fn test_minority_leader_times_out_and_late_commit_still_applies() {
    // GIVEN
    let config = KvConfig::default().set_request_timeout(Duration::from_millis(100));
    let cluster = TestCluster::start(3, config);
    cluster.cluster.disconnect(1);
    cluster.cluster.disconnect(2);

    // WHEN
    let reply = cluster.servers[0].put_append(put("k", "late", 4, 1)).await;

    // THEN
    assert_eq!(reply.status, Status::Timeout);

    // WHEN the partition heals
    cluster.cluster.reconnect(1);

    // THEN the timed-out write commits and the apply loop keeps serving
    let reply = cluster.servers[0].get(GetArgs { key: "k".into(), client_id: 4, seq: 2 }).await;
    assert_eq!(reply, GetReply { value: "late".into(), status: Status::Ok });
}
