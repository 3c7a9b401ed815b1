use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // NATS configuration
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// JetStream stream name for per-account work items
    #[serde(default = "default_work_stream")]
    pub work_stream: String,

    /// Durable consumer name shared by all collector worker loops
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,

    /// Batch size for the work item consumer
    #[serde(default = "default_nats_batch_size")]
    pub nats_batch_size: usize,

    /// Max wait time for work item batches in seconds
    #[serde(default = "default_nats_batch_wait_secs")]
    pub nats_batch_wait_secs: u64,

    /// Maximum deliveries before a work item is left to dead-letter handling
    #[serde(default = "default_work_max_deliver")]
    pub work_max_deliver: i64,

    /// Visibility timeout for an in-flight work item in seconds
    #[serde(default = "default_work_ack_wait_secs")]
    pub work_ack_wait_secs: u64,

    /// Object store bucket name for the report archive
    #[serde(default = "default_archive_bucket")]
    pub archive_bucket: String,

    /// Startup timeout for initialization operations in seconds
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// Number of concurrent collector worker loops
    #[serde(default = "default_collector_workers")]
    pub collector_workers: usize,

    // PostgreSQL configuration (account directory)
    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Account inventory table name
    #[serde(default = "default_accounts_table")]
    pub accounts_table: String,

    // Federation configuration
    /// Credential broker base URL
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    /// Delegated role name present in every member account
    #[serde(default = "default_federation_role")]
    pub federation_role: String,

    /// Session name attached to federated credentials
    #[serde(default = "default_federation_session_name")]
    pub federation_session_name: String,

    // Advisory API configuration
    /// Advisory check API base URL
    #[serde(default = "default_advisory_api_url")]
    pub advisory_api_url: String,

    /// HTTP client timeout in seconds (broker and advisory API)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    // OpenTelemetry configuration
    /// OpenTelemetry OTLP endpoint (gRPC)
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Enable OpenTelemetry export
    #[serde(default = "default_otel_enabled")]
    pub otel_enabled: bool,

    /// Service name for OpenTelemetry resource
    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

// NATS defaults
fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_work_stream() -> String {
    "advisory_work".to_string()
}

fn default_consumer_name() -> String {
    "advisory-collector".to_string()
}

fn default_nats_batch_size() -> usize {
    10
}

fn default_nats_batch_wait_secs() -> u64 {
    5
}

fn default_work_max_deliver() -> i64 {
    5
}

fn default_work_ack_wait_secs() -> u64 {
    300
}

fn default_archive_bucket() -> String {
    "advisory-archive".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    30
}

fn default_collector_workers() -> usize {
    4
}

// PostgreSQL defaults
fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "advisory".to_string()
}

fn default_postgres_username() -> String {
    "advisory".to_string()
}

fn default_postgres_password() -> String {
    "advisory".to_string()
}

fn default_accounts_table() -> String {
    "accounts".to_string()
}

// Federation defaults
fn default_broker_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_federation_role() -> String {
    "AdvisoryAuditRole".to_string()
}

fn default_federation_session_name() -> String {
    "advisory-collector".to_string()
}

// Advisory API defaults
fn default_advisory_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

// OpenTelemetry defaults
fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_enabled() -> bool {
    true
}

fn default_otel_service_name() -> String {
    "advisory-service".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("ADVISORY"))
            .build()?
            .try_deserialize()
    }
}
