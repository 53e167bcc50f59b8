mod common;
use common::TestCluster;
use raftkv::KvConfig;
use raftkv::prelude::*;

#[tokio::test]
async fn test_put_append_get_and_replay() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    let mut clerk = cluster.clerk();

    // WHEN
    clerk.put("x", "1").await;
    clerk.append("x", "2").await;

    // THEN
    assert_eq!(clerk.get("x").await, "12");

    // WHEN the very first request is replayed with its original seq
    let replay = PutAppendArgs {
        kind: WriteKind::Put,
        key: "x".into(),
        value: "1".into(),
        client_id: clerk.client_id(),
        seq: 1,
    };
    let reply = cluster.servers[0].put_append(replay).await;

    // THEN it reports success without taking effect
    assert_eq!(reply.status, Status::Ok);
    assert_eq!(clerk.get("x").await, "12");
}

#[tokio::test]
async fn test_appends_accumulate_on_absent_key() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    let mut clerk = cluster.clerk();

    // WHEN
    clerk.append("k", "a").await;
    clerk.append("k", "b").await;

    // THEN
    assert_eq!(clerk.get("k").await, "ab");
}

#[tokio::test]
async fn test_get_on_follower_reports_not_leader() {
    // GIVEN
    let cluster = TestCluster::start(3, KvConfig::default());
    cluster.clerk().put("k", "v").await;

    // WHEN
    let reply = cluster.servers[1].get(GetArgs { key: "k".into(), client_id: 9, seq: 1 }).await;

    // THEN
    assert_eq!(reply, GetReply { value: String::new(), status: Status::NotLeader });
}

#[tokio::test]
async fn test_get_absent_key_reports_no_such_key() {
    let cluster = TestCluster::start(1, KvConfig::default());
    let reply = cluster.servers[0].get(GetArgs { key: "nope".into(), client_id: 9, seq: 1 }).await;
    assert_eq!(reply, GetReply { value: String::new(), status: Status::NoSuchKey });
}
