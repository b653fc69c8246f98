#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc)]
mod common;

use common::sample_submission;
use contact_relay::adapters::redis::RedisSubmissionQueue;
use contact_relay::core::queue::SubmissionQueue;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const VISIBILITY: Duration = Duration::from_millis(300);

fn unique_prefix() -> String {
    format!("test:{}", Uuid::new_v4())
}

#[tokio::test]
async fn test_visibility_timeout_redelivers_with_attempt_count() {
    let redis = common::get_test_redis().await;
    let prefix = unique_prefix();
    let queue = RedisSubmissionQueue::new(Arc::clone(&redis), &prefix);

    let message_id = queue.enqueue(&sample_submission()).await.unwrap();

    let first = queue.lease(10, VISIBILITY).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].message_id, message_id);
    assert_eq!(first[0].attempts, 1);
    assert_eq!(first[0].submission, sample_submission());

    // Hidden while the lease is held.
    assert!(queue.lease(10, VISIBILITY).await.unwrap().is_empty());

    tokio::time::sleep(VISIBILITY * 2).await;

    let second = queue.lease(10, VISIBILITY).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].message_id, message_id);
    assert_eq!(second[0].attempts, 2);

    queue.bury(&second[0]).await.unwrap();

    tokio::time::sleep(VISIBILITY * 2).await;
    assert!(queue.lease(10, VISIBILITY).await.unwrap().is_empty());

    let mut conn = redis.connection();
    let poisoned: Vec<String> = conn.lrange(format!("{prefix}:poison"), 0, -1).await.unwrap();
    assert_eq!(poisoned.len(), 1);
    assert!(poisoned[0].contains("\"siteUrl\":\"example.com\""));
}

#[tokio::test]
async fn test_ack_removes_entry() {
    let redis = common::get_test_redis().await;
    let queue = RedisSubmissionQueue::new(redis, &unique_prefix());

    queue.enqueue(&sample_submission()).await.unwrap();
    let leased = queue.lease(10, VISIBILITY).await.unwrap();
    queue.ack(&leased[0].message_id).await.unwrap();

    tokio::time::sleep(VISIBILITY * 2).await;
    assert!(queue.lease(10, VISIBILITY).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lease_respects_limit() {
    let redis = common::get_test_redis().await;
    let queue = RedisSubmissionQueue::new(redis, &unique_prefix());

    for i in 0..3 {
        let mut submission = sample_submission();
        submission.id = format!("s{i}");
        queue.enqueue(&submission).await.unwrap();
    }

    assert_eq!(queue.lease(2, VISIBILITY).await.unwrap().len(), 2);
    assert_eq!(queue.lease(2, VISIBILITY).await.unwrap().len(), 1);
    assert!(queue.lease(0, VISIBILITY).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_undecodable_payload_is_poisoned() {
    let redis = common::get_test_redis().await;
    let prefix = unique_prefix();
    let queue = RedisSubmissionQueue::new(Arc::clone(&redis), &prefix);

    let mut conn = redis.connection();
    let () = conn.hset(format!("{prefix}:payloads"), "broken", "{not json").await.unwrap();
    let () = conn.zadd(format!("{prefix}:pending"), "broken", 0).await.unwrap();
    queue.enqueue(&sample_submission()).await.unwrap();

    let leased = queue.lease(10, VISIBILITY).await.unwrap();
    assert_eq!(leased.len(), 1);
    assert_eq!(leased[0].submission.id, "s1");

    let poisoned: Vec<String> = conn.lrange(format!("{prefix}:poison"), 0, -1).await.unwrap();
    assert_eq!(poisoned, vec!["{not json".to_string()]);
    let pending: usize = conn.zcard(format!("{prefix}:pending")).await.unwrap();
    assert_eq!(pending, 1);
}
