use crate::traits::JetStreamPublisher;
use advisory_domain::{AccountRef, DispatchError, WorkItemProducer};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Publishes one JSON-encoded AccountRef per account onto the work stream,
/// one subject per account under the stream's base subject.
pub struct NatsWorkItemProducer {
    publisher: Arc<dyn JetStreamPublisher>,
    base_subject: String,
}

impl NatsWorkItemProducer {
    pub fn new(publisher: Arc<dyn JetStreamPublisher>, base_subject: String) -> Self {
        debug!(base_subject = %base_subject, "initialized NatsWorkItemProducer");
        Self {
            publisher,
            base_subject,
        }
    }
}

#[async_trait]
impl WorkItemProducer for NatsWorkItemProducer {
    async fn enqueue(&self, account: &AccountRef) -> Result<(), DispatchError> {
        let payload = serde_json::to_vec(account).map_err(|e| DispatchError::Enqueue {
            account_id: account.account_id.clone(),
            source: e.into(),
        })?;

        let subject = format!("{}.{}", self.base_subject, account.account_id);

        self.publisher
            .publish(subject, payload.into())
            .await
            .map_err(|e| DispatchError::Enqueue {
                account_id: account.account_id.clone(),
                source: e,
            })?;

        debug!(
            account_id = %account.account_id,
            account_label = %account.account_label,
            "published work item"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockJetStreamPublisher;

    fn account() -> AccountRef {
        AccountRef {
            account_id: "111111111111".to_string(),
            account_label: "acme-prod".to_string(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_publishes_json_account_ref() {
        // Arrange
        let mut mock_publisher = MockJetStreamPublisher::new();

        mock_publisher
            .expect_publish()
            .withf(|subject: &String, payload: &bytes::Bytes| {
                let decoded: AccountRef = serde_json::from_slice(payload).unwrap();
                subject == "advisory_work.111111111111"
                    && decoded.account_id == "111111111111"
                    && decoded.account_label == "acme-prod"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let producer =
            NatsWorkItemProducer::new(Arc::new(mock_publisher), "advisory_work".to_string());

        // Act
        let result = producer.enqueue(&account()).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_enqueue_publish_failure_maps_to_dispatch_error() {
        // Arrange
        let mut mock_publisher = MockJetStreamPublisher::new();

        mock_publisher
            .expect_publish()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("stream acknowledgment timed out")));

        let producer =
            NatsWorkItemProducer::new(Arc::new(mock_publisher), "advisory_work".to_string());

        // Act
        let result = producer.enqueue(&account()).await;

        // Assert
        assert!(matches!(
            result,
            Err(DispatchError::Enqueue { account_id, .. }) if account_id == "111111111111"
        ));
    }
}
