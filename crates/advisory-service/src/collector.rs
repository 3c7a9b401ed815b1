use advisory_domain::CollectionService;
use advisory_nats::{create_work_item_processor, NatsClient, NatsWorkItemConsumer, WorkStreamConfig};
use advisory_runner::Process;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct CollectorWorkerConfig {
    pub stream: WorkStreamConfig,
    pub consumer_name: String,
    pub batch_size: usize,
    pub batch_wait_secs: u64,
    pub workers: usize,
}

/// A set of concurrent work item consumer loops. All loops share one
/// durable consumer name, so the queue load-balances accounts across them
/// instead of delivering every account to every loop.
pub struct CollectorWorker {
    consumers: Vec<NatsWorkItemConsumer>,
}

impl CollectorWorker {
    pub async fn new(
        nats_client: &NatsClient,
        config: CollectorWorkerConfig,
        service: Arc<CollectionService>,
    ) -> Result<Self> {
        let mut consumers = Vec::with_capacity(config.workers);
        for _ in 0..config.workers {
            let consumer = NatsWorkItemConsumer::new(
                nats_client.jetstream(),
                &config.stream,
                &config.consumer_name,
                config.batch_size,
                config.batch_wait_secs,
                create_work_item_processor(Arc::clone(&service)),
            )
            .await?;
            consumers.push(consumer);
        }

        info!(
            workers = config.workers,
            consumer = %config.consumer_name,
            "collector workers initialized"
        );

        Ok(Self { consumers })
    }

    /// Convert into runner processes, one per worker loop.
    pub fn into_runner_processes(self) -> Vec<Process> {
        self.consumers
            .into_iter()
            .map(|consumer| {
                let process: Process =
                    Box::new(move |token| Box::pin(async move { consumer.run(token).await }));
                process
            })
            .collect()
    }
}
