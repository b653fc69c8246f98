use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub queue: QueueConfig,

    #[command(flatten)]
    pub mail: MailConfig,

    #[command(flatten)]
    pub sender: SenderConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[arg(long = "database-url", env = "RELAY_DATABASE_URL")]
    pub url: String,

    /// Maximum number of pooled connections
    #[arg(long = "db-max-connections", env = "RELAY_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Minimum number of idle connections kept open
    #[arg(long = "db-min-connections", env = "RELAY_DB_MIN_CONNECTIONS", default_value_t = 1)]
    pub min_connections: u32,

    #[arg(long = "db-acquire-timeout-secs", env = "RELAY_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub acquire_timeout_secs: u64,

    #[arg(long = "db-idle-timeout-secs", env = "RELAY_DB_IDLE_TIMEOUT_SECS", default_value_t = 600)]
    pub idle_timeout_secs: u64,

    #[arg(long = "db-max-lifetime-secs", env = "RELAY_DB_MAX_LIFETIME_SECS", default_value_t = 1800)]
    pub max_lifetime_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the submission intake API
    #[arg(long, env = "RELAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for health probes
    #[arg(long, env = "RELAY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// How long to wait for in-flight submissions on shutdown
    #[arg(long, env = "RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct QueueConfig {
    /// Redis connection URL backing the submission queue
    #[arg(long = "redis-url", env = "RELAY_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Prefix for all queue keys
    #[arg(long = "queue-key-prefix", env = "RELAY_QUEUE_KEY_PREFIX", default_value = "contact-relay:submissions")]
    pub key_prefix: String,

    /// How often the worker polls for visible submissions
    #[arg(long = "queue-poll-interval-ms", env = "RELAY_QUEUE_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// How long a leased submission stays hidden before it is redelivered
    #[arg(long = "queue-visibility-timeout-secs", env = "RELAY_QUEUE_VISIBILITY_TIMEOUT_SECS", default_value_t = 30)]
    pub visibility_timeout_secs: u64,

    /// Deliveries allowed before a submission is moved to the poison list
    #[arg(long = "queue-max-attempts", env = "RELAY_QUEUE_MAX_ATTEMPTS", default_value_t = 5)]
    pub max_attempts: u32,

    /// Maximum submissions processed concurrently
    #[arg(long = "queue-concurrency", env = "RELAY_QUEUE_CONCURRENCY", default_value_t = 16)]
    pub concurrency: usize,

    /// Initial backoff when connecting to Redis
    #[arg(long = "redis-min-backoff-secs", env = "RELAY_REDIS_MIN_BACKOFF_SECS", default_value_t = 1)]
    pub min_backoff_secs: u64,

    /// Maximum backoff when connecting to Redis
    #[arg(long = "redis-max-backoff-secs", env = "RELAY_REDIS_MAX_BACKOFF_SECS", default_value_t = 30)]
    pub max_backoff_secs: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MailTransportKind {
    Sendgrid,
    Smtp,
    Log,
}

#[derive(Clone, Debug, Args)]
pub struct MailConfig {
    /// Outbound mail transport
    #[arg(long = "mail-transport", env = "RELAY_MAIL_TRANSPORT", value_enum, default_value_t = MailTransportKind::Log)]
    pub transport: MailTransportKind,

    /// `SendGrid` API key
    #[arg(long = "sendgrid-api-key", env = "RELAY_SENDGRID_API_KEY")]
    pub sendgrid_api_key: Option<String>,

    /// `SendGrid` mail send endpoint
    #[arg(long = "sendgrid-endpoint", env = "RELAY_SENDGRID_ENDPOINT", default_value = "https://api.sendgrid.com/v3/mail/send")]
    pub sendgrid_endpoint: String,

    #[arg(long = "smtp-host", env = "RELAY_SMTP_HOST", default_value = "localhost")]
    pub smtp_host: String,

    #[arg(long = "smtp-port", env = "RELAY_SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Leave empty for unauthenticated relays (e.g. MailDev)
    #[arg(long = "smtp-username", env = "RELAY_SMTP_USERNAME", default_value = "")]
    pub smtp_username: String,

    #[arg(long = "smtp-password", env = "RELAY_SMTP_PASSWORD", default_value = "")]
    pub smtp_password: String,

    /// Timeout for a single delivery attempt
    #[arg(long = "mail-timeout-secs", env = "RELAY_MAIL_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SenderNameMode {
    /// Always use the configured label
    Static,
    /// Use "{field value} (web)", falling back to the label
    Field,
}

#[derive(Clone, Debug, Args)]
pub struct SenderConfig {
    /// How the sender display name is chosen
    #[arg(long = "sender-name-mode", env = "RELAY_SENDER_NAME_MODE", value_enum, default_value_t = SenderNameMode::Static)]
    pub name_mode: SenderNameMode,

    /// Display name used in static mode and as the field-mode fallback
    #[arg(long = "sender-name-label", env = "RELAY_SENDER_NAME_LABEL", default_value = "Contacto web")]
    pub label: String,

    /// Submission field the display name is derived from in field mode
    #[arg(long = "sender-name-field", env = "RELAY_SENDER_NAME_FIELD", default_value = "name")]
    pub field: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint; exporters are disabled when unset
    #[arg(long = "otlp-endpoint", env = "RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    #[arg(long = "log-format", env = "RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
