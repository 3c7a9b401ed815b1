pub mod clock;
pub mod collection_service;
pub mod directory;
pub mod dispatch_service;
pub mod error;
pub mod ports;
pub mod report;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use collection_service::{archive_key, CollectOutcome, CollectionService};
pub use directory::{AccountDirectory, StaticAccountDirectory};
pub use dispatch_service::DispatchService;
pub use error::{
    CollectError, DirectoryError, DispatchError, FederationError, RetrievalError, UploadError,
};
pub use ports::{AdvisorySource, ArchiveStore, CredentialFederator, WorkItemProducer};
pub use types::{
    AccountRef, CheckDescriptor, CheckResult, CheckStatus, CheckSummary, FederatedCredentials,
};

// Re-export mocks when the testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "testing"))]
pub use directory::MockAccountDirectory;
#[cfg(any(test, feature = "testing"))]
pub use ports::MockAdvisorySource;
#[cfg(any(test, feature = "testing"))]
pub use ports::MockArchiveStore;
#[cfg(any(test, feature = "testing"))]
pub use ports::MockCredentialFederator;
#[cfg(any(test, feature = "testing"))]
pub use ports::MockWorkItemProducer;
