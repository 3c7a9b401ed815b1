use advisory_domain::DispatchService;
use advisory_nats::{NatsClient, NatsWorkItemProducer};
use advisory_postgres::{PostgresAccountDirectory, PostgresClient};
use advisory_service::{
    init_telemetry, shutdown_telemetry, ServiceConfig, TelemetryConfig, TelemetryProviders,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// One-shot dispatcher: scans the account directory and fans out one work
/// item per account onto the work queue, then exits. Intended to run on a
/// schedule (one invocation per collection day).
#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: "advisory-dispatcher".to_string(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        work_stream = %config.work_stream,
        accounts_table = %config.accounts_table,
        "Starting advisory dispatcher"
    );

    let result = dispatch(&config).await;

    shutdown_telemetry(telemetry_providers);

    match result {
        Ok(dispatched) => {
            info!(dispatched, "Dispatch run complete");
        }
        Err(e) => {
            error!("Dispatch run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn dispatch(config: &ServiceConfig) -> anyhow::Result<usize> {
    let postgres_client = PostgresClient::new(
        &config.postgres_host,
        config.postgres_port,
        &config.postgres_database,
        &config.postgres_username,
        &config.postgres_password,
        2,
    )?;
    postgres_client.ping().await?;

    let nats_client = NatsClient::connect(
        &config.nats_url,
        Duration::from_secs(config.startup_timeout_secs),
    )
    .await?;
    nats_client.ensure_work_stream(&config.work_stream).await?;

    let directory = Arc::new(PostgresAccountDirectory::new(
        postgres_client,
        config.accounts_table.clone(),
    ));
    let producer = Arc::new(NatsWorkItemProducer::new(
        nats_client.create_publisher_client(),
        config.work_stream.clone(),
    ));

    let service = DispatchService::new(directory, producer);
    let dispatched = service.dispatch().await?;

    nats_client.close().await;

    Ok(dispatched)
}
