use crate::adapters::database::DbPool;
use crate::adapters::redis::RedisClient;
use opentelemetry::{KeyValue, global, metrics::Histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
struct HealthMetrics {
    check_duration_seconds: Histogram<f64>,
}

impl HealthMetrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            check_duration_seconds: meter
                .f64_histogram("health_check_duration_seconds")
                .with_description("Duration of health checks")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
    redis: Arc<RedisClient>,
    metrics: HealthMetrics,
}

impl HealthService {
    #[must_use]
    pub fn new(pool: DbPool, redis: Arc<RedisClient>) -> Self {
        Self { pool, redis, metrics: HealthMetrics::new() }
    }

    /// # Errors
    /// Returns a description of the failure if the database is unreachable.
    pub async fn check_db(&self) -> Result<(), String> {
        let start = Instant::now();

        let res = match timeout(CHECK_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("Database connection failed: {e}")),
            Err(_) => Err("Database connection timed out".to_string()),
        };

        self.metrics.check_duration_seconds.record(start.elapsed().as_secs_f64(), &[KeyValue::new("component", "database")]);
        res
    }

    /// # Errors
    /// Returns a description of the failure if Redis is unreachable.
    pub async fn check_queue(&self) -> Result<(), String> {
        let start = Instant::now();

        let res = match timeout(CHECK_TIMEOUT, self.redis.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Redis connection failed: {e}")),
            Err(_) => Err("Redis connection timed out".to_string()),
        };

        self.metrics.check_duration_seconds.record(start.elapsed().as_secs_f64(), &[KeyValue::new("component", "queue")]);
        res
    }
}
