pub mod collector;
pub mod config;
pub mod telemetry;

pub use collector::{CollectorWorker, CollectorWorkerConfig};
pub use config::ServiceConfig;
pub use telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig, TelemetryProviders};
