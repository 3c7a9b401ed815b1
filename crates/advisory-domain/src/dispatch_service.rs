use crate::directory::AccountDirectory;
use crate::error::DirectoryError;
use crate::ports::WorkItemProducer;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fan-out service run once per schedule tick.
///
/// Reads the account directory exactly once and enqueues one work item per
/// account. Each enqueue is independent: one account's failure is logged
/// and skipped so it cannot block the rest of the fan-out. A directory
/// failure is fatal to the whole tick, so a missing day is visible instead
/// of silently incomplete.
pub struct DispatchService {
    directory: Arc<dyn AccountDirectory>,
    producer: Arc<dyn WorkItemProducer>,
}

impl DispatchService {
    pub fn new(directory: Arc<dyn AccountDirectory>, producer: Arc<dyn WorkItemProducer>) -> Self {
        Self {
            directory,
            producer,
        }
    }

    /// Returns the number of work items actually enqueued.
    pub async fn dispatch(&self) -> Result<usize, DirectoryError> {
        info!("starting advisory fan-out");

        let accounts = self.directory.list_accounts().await?;
        info!(
            account_count = accounts.len(),
            "fetched accounts from directory"
        );

        let mut enqueued = 0usize;
        for account in &accounts {
            match self.producer.enqueue(account).await {
                Ok(()) => {
                    debug!(account_id = %account.account_id, "enqueued work item");
                    enqueued += 1;
                }
                Err(e) => {
                    // Queue durability and redelivery are the queue's job;
                    // all the dispatcher owes the failed account is a log line.
                    error!(
                        account_id = %account.account_id,
                        account_label = %account.account_label,
                        error = %e,
                        "failed to enqueue work item"
                    );
                }
            }
        }

        info!(enqueued, total = accounts.len(), "fan-out complete");
        Ok(enqueued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MockAccountDirectory;
    use crate::error::DispatchError;
    use crate::ports::MockWorkItemProducer;
    use crate::types::AccountRef;

    fn account(id: &str, label: &str) -> AccountRef {
        AccountRef {
            account_id: id.to_string(),
            account_label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_enqueues_one_item_per_account() {
        // Arrange
        let mut mock_directory = MockAccountDirectory::new();
        let mut mock_producer = MockWorkItemProducer::new();

        let accounts = vec![
            account("111111111111", "acme-prod"),
            account("222222222222", "acme-dev"),
        ];
        mock_directory
            .expect_list_accounts()
            .times(1)
            .return_once(move || Ok(accounts));

        mock_producer
            .expect_enqueue()
            .times(2)
            .returning(|_| Ok(()));

        let service = DispatchService::new(Arc::new(mock_directory), Arc::new(mock_producer));

        // Act
        let count = service.dispatch().await.unwrap();

        // Assert
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_dispatch_one_enqueue_failure_does_not_block_others() {
        // Arrange
        let mut mock_directory = MockAccountDirectory::new();
        let mut mock_producer = MockWorkItemProducer::new();

        let accounts = vec![
            account("111111111111", "acme-prod"),
            account("222222222222", "acme-dev"),
            account("333333333333", "acme-staging"),
        ];
        mock_directory
            .expect_list_accounts()
            .times(1)
            .return_once(move || Ok(accounts));

        // The middle account fails to enqueue; both neighbors still go out
        mock_producer
            .expect_enqueue()
            .times(3)
            .returning(|account: &AccountRef| {
                if account.account_id == "222222222222" {
                    Err(DispatchError::Enqueue {
                        account_id: account.account_id.clone(),
                        source: anyhow::anyhow!("queue rejected publish"),
                    })
                } else {
                    Ok(())
                }
            });

        let service = DispatchService::new(Arc::new(mock_directory), Arc::new(mock_producer));

        // Act
        let count = service.dispatch().await.unwrap();

        // Assert
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_dispatch_directory_failure_is_fatal() {
        // Arrange
        let mut mock_directory = MockAccountDirectory::new();
        let mut mock_producer = MockWorkItemProducer::new();

        mock_directory
            .expect_list_accounts()
            .times(1)
            .return_once(|| {
                Err(DirectoryError::Unreachable(anyhow::anyhow!(
                    "inventory scan timed out"
                )))
            });

        // No partial fan-out is attempted
        mock_producer.expect_enqueue().times(0);

        let service = DispatchService::new(Arc::new(mock_directory), Arc::new(mock_producer));

        // Act
        let result = service.dispatch().await;

        // Assert
        assert!(matches!(result, Err(DirectoryError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_dispatch_empty_directory() {
        // Arrange
        let mut mock_directory = MockAccountDirectory::new();
        let mut mock_producer = MockWorkItemProducer::new();

        mock_directory
            .expect_list_accounts()
            .times(1)
            .return_once(|| Ok(Vec::new()));
        mock_producer.expect_enqueue().times(0);

        let service = DispatchService::new(Arc::new(mock_directory), Arc::new(mock_producer));

        // Act
        let count = service.dispatch().await.unwrap();

        // Assert
        assert_eq!(count, 0);
    }
}
