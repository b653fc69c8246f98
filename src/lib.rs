#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod telemetry;
pub mod workers;

use crate::adapters::database::{DbPool, PgContactStore, PgSettingsStore};
use crate::adapters::mail::MailTransport;
use crate::adapters::redis::{RedisClient, RedisSubmissionQueue};
use crate::api::{AppState, MgmtState};
use crate::config::Config;
use crate::core::health_service::HealthService;
use crate::core::message_builder::{MessageBuilder, SenderName};
use crate::core::processor::SubmissionProcessor;
use crate::core::queue::SubmissionQueue;
use crate::workers::SubmissionWorker;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Fully wired application: router state plus background workers.
#[derive(Debug)]
pub struct App {
    pub app_state: AppState,
    pub mgmt_state: MgmtState,
    pub workers: Workers,
}

#[derive(Debug)]
pub struct Workers {
    submission: SubmissionWorker,
}

impl Workers {
    #[must_use]
    pub fn spawn_all(self, shutdown_rx: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        vec![tokio::spawn(self.submission.run(shutdown_rx))]
    }
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    pool: Option<DbPool>,
    redis: Option<Arc<RedisClient>>,
    transport: Option<Arc<dyn MailTransport>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, pool: None, redis: None, transport: None }
    }

    #[must_use]
    pub fn with_database(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_redis(mut self, redis: Arc<RedisClient>) -> Self {
        self.redis = Some(redis);
        self
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Wires stores, queue, processor and worker, and makes sure the store tables exist.
    ///
    /// # Errors
    /// Returns an error if a required component is missing or the stores cannot be created.
    pub async fn build(self) -> anyhow::Result<App> {
        let pool = self.pool.ok_or_else(|| anyhow::anyhow!("Database pool is required"))?;
        let redis = self.redis.ok_or_else(|| anyhow::anyhow!("Redis client is required"))?;
        let transport = self.transport.ok_or_else(|| anyhow::anyhow!("Mail transport is required"))?;

        let processor = Arc::new(SubmissionProcessor::new(
            Arc::new(PgSettingsStore::new(pool.clone())),
            Arc::new(PgContactStore::new(pool.clone())),
            MessageBuilder::new(SenderName::from(&self.config.sender)),
        ));
        processor.ensure_stores().await?;

        let queue: Arc<dyn SubmissionQueue> =
            Arc::new(RedisSubmissionQueue::new(Arc::clone(&redis), &self.config.queue.key_prefix));

        let worker = SubmissionWorker::new(Arc::clone(&queue), processor, transport, &self.config.queue);

        Ok(App {
            app_state: AppState { queue },
            mgmt_state: MgmtState { health_service: HealthService::new(pool, redis) },
            workers: Workers { submission: worker },
        })
    }
}

/// Routes panics through `tracing` so they reach structured logs.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(panic.location = %location, panic.payload = %payload, "Panic occurred");
    }));
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
