use crate::error::{DispatchError, FederationError, RetrievalError, UploadError};
use crate::types::{AccountRef, CheckDescriptor, CheckSummary, FederatedCredentials};
use async_trait::async_trait;

/// Enqueues one work item per account onto the durable work queue.
/// Infrastructure layer (advisory-nats) implements this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WorkItemProducer: Send + Sync {
    /// Enqueue a single account as an independent message
    async fn enqueue(&self, account: &AccountRef) -> Result<(), DispatchError>;
}

/// Produces short-lived scoped credentials for a target account.
/// Infrastructure layer (advisory-api) implements this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialFederator: Send + Sync {
    /// Assume the delegated role `role_name` in `account_id`
    async fn federate(
        &self,
        account_id: &str,
        role_name: &str,
    ) -> Result<FederatedCredentials, FederationError>;
}

/// Credential-scoped read access to an account's advisory check data.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    /// The full check catalog for the account
    async fn list_checks(
        &self,
        credentials: &FederatedCredentials,
    ) -> Result<Vec<CheckDescriptor>, RetrievalError>;

    /// Evaluated summaries for the given check ids. Checks the source has
    /// not evaluated may be absent from the result; callers must treat
    /// absence as `NotAvailable`, not as an error.
    async fn check_summaries(
        &self,
        credentials: &FederatedCredentials,
        check_ids: &[String],
    ) -> Result<Vec<CheckSummary>, RetrievalError>;
}

/// Date-partitioned durable object store holding one object per
/// (date, account). Uploads overwrite; there is no append.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Write the full object in one call
    async fn upload(&self, key: &str, content: bytes::Bytes) -> Result<(), UploadError>;

    /// Whether an object already exists at `key`
    async fn exists(&self, key: &str) -> Result<bool, UploadError>;
}
