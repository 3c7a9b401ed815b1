use advisory_domain::{AccountRef, CollectError, CollectOutcome, CollectionService};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Type alias for the per-work-item processor function.
/// Takes a decoded AccountRef and returns the collection outcome; the
/// consumer owns message decoding and acknowledgment.
pub type WorkItemProcessor =
    Box<dyn Fn(AccountRef) -> BoxFuture<'static, Result<CollectOutcome, CollectError>> + Send + Sync>;

/// Create a WorkItemProcessor that routes each work item through the
/// collection service.
pub fn create_work_item_processor(service: Arc<CollectionService>) -> WorkItemProcessor {
    Box::new(move |account: AccountRef| {
        let service = Arc::clone(&service);
        Box::pin(async move { service.collect(&account).await })
    })
}

// Note: unit tests for the processor wiring are not practical because we
// cannot construct actual NATS Message objects without a real NATS
// connection. The collection semantics themselves are covered by the
// CollectionService tests in advisory-domain.
