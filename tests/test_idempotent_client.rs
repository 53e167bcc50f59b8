mod common;
use common::TestCluster;
use raftkv::KvConfig;
use raftkv::prelude::*;

fn append(key: &str, value: &str, client_id: i64, seq: u64) -> PutAppendArgs {
    PutAppendArgs { kind: WriteKind::Append, key: key.into(), value: value.into(), client_id, seq }
}

#[tokio::test]
async fn test_same_request_twice_mutates_once() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    let leader = &cluster.servers[0];

    // WHEN
    let first = leader.put_append(append("k", "a", 7, 1)).await;
    let second = leader.put_append(append("k", "a", 7, 1)).await;

    // THEN
    assert_eq!(first.status, Status::Ok);
    assert_eq!(second.status, Status::Ok);
    let reply = leader.get(GetArgs { key: "k".into(), client_id: 7, seq: 2 }).await;
    assert_eq!(reply.value, "a");
}

#[tokio::test]
async fn test_concurrent_duplicates_both_succeed_and_apply_once() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    let leader = cluster.servers[0].clone();

    // WHEN both copies are ordered before either is applied
    let (first, second) = tokio::join!(
        leader.put_append(append("k", "x", 3, 1)),
        leader.put_append(append("k", "x", 3, 1))
    );

    // THEN
    assert_eq!(first.status, Status::Ok);
    assert_eq!(second.status, Status::Ok);
    let reply = leader.get(GetArgs { key: "k".into(), client_id: 3, seq: 2 }).await;
    assert_eq!(reply.value, "x");
}

#[tokio::test]
async fn test_higher_seq_applies_after_replay() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    let leader = &cluster.servers[0];
    leader.put_append(append("k", "1", 5, 1)).await;
    leader.put_append(append("k", "1", 5, 1)).await;

    // WHEN
    let reply = leader.put_append(append("k", "2", 5, 2)).await;

    // THEN
    assert_eq!(reply.status, Status::Ok);
    let reply = leader.get(GetArgs { key: "k".into(), client_id: 5, seq: 3 }).await;
    assert_eq!(reply.value, "12");
}
