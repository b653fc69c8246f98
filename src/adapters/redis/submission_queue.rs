use crate::adapters::redis::RedisClient;
use crate::core::queue::{LeasedSubmission, SubmissionQueue};
use crate::domain::submission::Submission;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// KEYS: pending zset, payload hash, attempts hash
// ARGV: now (ms), invisible-until (ms), limit
// Returns flat triples of (id, attempts, payload).
const LEASE_SCRIPT: &str = r"
local due = redis.call('ZRANGEBYSCORE', KEYS[1], '-inf', ARGV[1], 'LIMIT', 0, tonumber(ARGV[3]))
local out = {}
for _, id in ipairs(due) do
    local payload = redis.call('HGET', KEYS[2], id)
    if payload then
        redis.call('ZADD', KEYS[1], 'XX', ARGV[2], id)
        local attempts = redis.call('HINCRBY', KEYS[3], id, 1)
        table.insert(out, id)
        table.insert(out, tostring(attempts))
        table.insert(out, payload)
    else
        redis.call('ZREM', KEYS[1], id)
        redis.call('HDEL', KEYS[3], id)
    end
end
return out
";

/// Visibility-timeout queue on Redis.
///
/// Entries sit in a sorted set scored by the time they become visible. Leasing
/// pushes the score into the future, so an entry that is never acknowledged
/// is delivered again once its timeout passes.
#[derive(Debug, Clone)]
pub struct RedisSubmissionQueue {
    redis: Arc<RedisClient>,
    pending_key: String,
    payloads_key: String,
    attempts_key: String,
    poison_key: String,
}

impl RedisSubmissionQueue {
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, key_prefix: &str) -> Self {
        Self {
            redis,
            pending_key: format!("{key_prefix}:pending"),
            payloads_key: format!("{key_prefix}:payloads"),
            attempts_key: format!("{key_prefix}:attempts"),
            poison_key: format!("{key_prefix}:poison"),
        }
    }

    fn now_millis() -> i64 {
        i64::try_from(time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
    }

    async fn move_to_poison(&self, message_id: &str, payload: &str) -> anyhow::Result<()> {
        let mut conn = self.redis.connection();
        let () = redis::pipe()
            .atomic()
            .lpush(&self.poison_key, payload)
            .ignore()
            .zrem(&self.pending_key, message_id)
            .ignore()
            .hdel(&self.payloads_key, message_id)
            .ignore()
            .hdel(&self.attempts_key, message_id)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionQueue for RedisSubmissionQueue {
    #[tracing::instrument(level = "debug", skip(self, submission), fields(submission_id = %submission.id), err)]
    async fn enqueue(&self, submission: &Submission) -> anyhow::Result<String> {
        let message_id = Uuid::now_v7().to_string();
        let payload = serde_json::to_string(submission)?;

        let mut conn = self.redis.connection();
        let () = redis::pipe()
            .atomic()
            .hset(&self.payloads_key, &message_id, payload)
            .ignore()
            .zadd(&self.pending_key, &message_id, Self::now_millis())
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(message_id)
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn lease(&self, limit: usize, visibility_timeout: Duration) -> anyhow::Result<Vec<LeasedSubmission>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let now = Self::now_millis();
        let invisible_until = now.saturating_add(i64::try_from(visibility_timeout.as_millis()).unwrap_or(i64::MAX));

        let mut conn = self.redis.connection();
        let raw: Vec<String> = redis::Script::new(LEASE_SCRIPT)
            .key(&self.pending_key)
            .key(&self.payloads_key)
            .key(&self.attempts_key)
            .arg(now)
            .arg(invisible_until)
            .arg(limit)
            .invoke_async(&mut conn)
            .await?;

        let mut leased = Vec::with_capacity(raw.len() / 3);
        for entry in raw.chunks_exact(3) {
            let (message_id, attempts, payload) = (&entry[0], &entry[1], &entry[2]);

            match serde_json::from_str::<Submission>(payload) {
                Ok(submission) => leased.push(LeasedSubmission {
                    message_id: message_id.clone(),
                    attempts: attempts.parse().unwrap_or(1),
                    submission,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, message_id = %message_id, "Undecodable submission, moving to poison list");
                    self.move_to_poison(message_id, payload).await?;
                }
            }
        }

        Ok(leased)
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn ack(&self, message_id: &str) -> anyhow::Result<()> {
        let mut conn = self.redis.connection();
        let () = redis::pipe()
            .atomic()
            .zrem(&self.pending_key, message_id)
            .ignore()
            .hdel(&self.payloads_key, message_id)
            .ignore()
            .hdel(&self.attempts_key, message_id)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, leased), fields(message_id = %leased.message_id), err)]
    async fn bury(&self, leased: &LeasedSubmission) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&leased.submission)?;
        self.move_to_poison(&leased.message_id, &payload).await
    }
}
