use advisory_api::{HttpAdvisorySource, HttpCredentialFederator};
use advisory_domain::{CollectionService, SystemClock};
use advisory_nats::{NatsArchiveStore, NatsClient, WorkStreamConfig};
use advisory_runner::Runner;
use advisory_service::{
    init_telemetry, shutdown_telemetry, CollectorWorker, CollectorWorkerConfig, ServiceConfig,
    TelemetryConfig, TelemetryProviders,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Long-running collector: a set of worker loops pulling per-account work
/// items from the queue and archiving one report object per account.
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
        service_name: config.otel_service_name.clone(),
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
        archive_bucket = %config.archive_bucket,
        workers = config.collector_workers,
        "Starting advisory collector"
    );

    let nats_client = match initialize_nats(&config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to initialize NATS: {:#}", e);
            std::process::exit(1);
        }
    };

    let collection_service = match build_collection_service(&config, &nats_client).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to initialize collection service: {:#}", e);
            std::process::exit(1);
        }
    };

    let collector_worker = match CollectorWorker::new(
        &nats_client,
        CollectorWorkerConfig {
            stream: WorkStreamConfig {
                stream_name: config.work_stream.clone(),
                max_deliver: config.work_max_deliver,
                ack_wait_secs: config.work_ack_wait_secs,
            },
            consumer_name: config.consumer_name.clone(),
            batch_size: config.nats_batch_size,
            batch_wait_secs: config.nats_batch_wait_secs,
            workers: config.collector_workers,
        },
        collection_service,
    )
    .await
    {
        Ok(worker) => worker,
        Err(e) => {
            error!("Failed to initialize collector workers: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut runner = Runner::new();

    for (i, process) in collector_worker.into_runner_processes().into_iter().enumerate() {
        runner = runner.with_named_process(format!("collector_worker_{}", i), process);
    }

    runner = runner
        .with_closer({
            let nats_for_close = Arc::clone(&nats_client);
            move || {
                Box::pin(async move {
                    info!("Running cleanup tasks...");
                    if let Ok(client) = Arc::try_unwrap(nats_for_close) {
                        client.close().await;
                    }

                    shutdown_telemetry(telemetry_providers);

                    info!("Cleanup complete");
                    Ok(())
                })
            }
        })
        .with_closer_timeout(Duration::from_secs(10));

    runner.run().await;
}

async fn initialize_nats(config: &ServiceConfig) -> anyhow::Result<NatsClient> {
    let nats_client = NatsClient::connect(
        &config.nats_url,
        Duration::from_secs(config.startup_timeout_secs),
    )
    .await?;
    nats_client.ensure_work_stream(&config.work_stream).await?;
    Ok(nats_client)
}

async fn build_collection_service(
    config: &ServiceConfig,
    nats_client: &NatsClient,
) -> anyhow::Result<Arc<CollectionService>> {
    let http_timeout = Duration::from_secs(config.http_timeout_secs);

    let federator = Arc::new(HttpCredentialFederator::new(
        config.broker_url.clone(),
        config.federation_session_name.clone(),
        http_timeout,
    )?);
    let source = Arc::new(HttpAdvisorySource::new(
        config.advisory_api_url.clone(),
        http_timeout,
    )?);
    let archive = Arc::new(
        NatsArchiveStore::new(nats_client.jetstream(), &config.archive_bucket).await?,
    );

    Ok(Arc::new(CollectionService::new(
        federator,
        source,
        archive,
        Arc::new(SystemClock),
        config.federation_role.clone(),
    )))
}
