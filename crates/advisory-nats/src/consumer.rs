use crate::client::WorkStreamConfig;
use crate::processor::WorkItemProcessor;
use advisory_domain::{AccountRef, CollectOutcome};
use anyhow::{Context, Result};
use async_nats::jetstream::{self, consumer::PullConsumer, AckKind};
use futures::StreamExt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Work queue consumer: a durable pull consumer that delivers one account
/// per message to the processor.
///
/// Acknowledgment rules: a processed or already-archived account is acked
/// (idempotent deletion from the queue); any failure naks the message so
/// the queue redelivers it, bounded by the consumer's max-deliver policy.
/// Several loops may share the same durable consumer name; JetStream then
/// load-balances messages across them.
pub struct NatsWorkItemConsumer {
    consumer: PullConsumer,
    batch_size: usize,
    max_wait: Duration,
    processor: WorkItemProcessor,
}

impl NatsWorkItemConsumer {
    pub async fn new(
        jetstream: &jetstream::Context,
        stream: &WorkStreamConfig,
        consumer_name: &str,
        batch_size: usize,
        max_wait_secs: u64,
        processor: WorkItemProcessor,
    ) -> Result<Self> {
        debug!(
            stream = %stream.stream_name,
            consumer = consumer_name,
            max_deliver = stream.max_deliver,
            ack_wait_secs = stream.ack_wait_secs,
            "Creating work item consumer"
        );

        // Create or get the existing durable consumer
        let consumer = jetstream
            .create_consumer_on_stream(
                jetstream::consumer::pull::Config {
                    name: Some(consumer_name.to_string()),
                    durable_name: Some(consumer_name.to_string()),
                    filter_subject: format!("{}.*", stream.stream_name),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    max_deliver: stream.max_deliver,
                    ack_wait: Duration::from_secs(stream.ack_wait_secs),
                    ..Default::default()
                },
                stream.stream_name.as_str(),
            )
            .await
            .context("Failed to create work item consumer")?;

        info!(
            stream = %stream.stream_name,
            consumer = consumer_name,
            "Work item consumer created successfully"
        );

        Ok(Self {
            consumer,
            batch_size,
            max_wait: Duration::from_secs(max_wait_secs),
            processor,
        })
    }

    pub async fn run(&self, ctx: CancellationToken) -> Result<()> {
        info!("Starting work item consumer loop");

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!("Received shutdown signal, stopping consumer");
                    break;
                }
                result = self.fetch_and_process_batch() => {
                    if let Err(e) = result {
                        error!(error = %e, "Error processing work item batch");
                        // Continue consuming despite errors
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!("Work item consumer stopped gracefully");
        Ok(())
    }

    async fn fetch_and_process_batch(&self) -> Result<()> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(self.batch_size)
            .expires(self.max_wait)
            .messages()
            .await
            .context("Failed to fetch work items")?;

        while let Some(result) = messages.next().await {
            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "Error receiving work item from batch");
                    continue;
                }
            };

            self.process_message(message).await;
        }

        Ok(())
    }

    async fn process_message(&self, message: jetstream::Message) {
        let account: AccountRef = match serde_json::from_slice(&message.payload) {
            Ok(account) => account,
            Err(e) => {
                error!(
                    error = %e,
                    subject = %message.subject,
                    "failed to decode work item payload"
                );
                Self::nak(&message).await;
                return;
            }
        };

        match (self.processor)(account.clone()).await {
            Ok(CollectOutcome::Collected { rows }) => {
                debug!(
                    account_id = %account.account_id,
                    rows,
                    "work item processed"
                );
                Self::ack(&message).await;
            }
            Ok(CollectOutcome::AlreadyArchived) => {
                debug!(
                    account_id = %account.account_id,
                    "duplicate delivery short-circuited"
                );
                Self::ack(&message).await;
            }
            Err(e) => {
                // Leave the message for queue-managed redelivery; after the
                // consumer's max-deliver the operator inspects the
                // dead-letter sink
                error!(
                    account_id = %account.account_id,
                    stage = e.stage(),
                    error = %e,
                    "work item failed, leaving for redelivery"
                );
                Self::nak(&message).await;
            }
        }
    }

    async fn ack(message: &jetstream::Message) {
        if let Err(e) = message.ack().await {
            error!(error = %e, "Failed to acknowledge work item");
        }
    }

    async fn nak(message: &jetstream::Message) {
        if let Err(e) = message.ack_with(AckKind::Nak(None)).await {
            error!(error = %e, "Failed to reject work item");
        }
    }
}
