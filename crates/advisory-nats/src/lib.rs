pub mod archive;
pub mod client;
pub mod consumer;
pub mod processor;
pub mod producer;
pub mod traits;

pub use archive::NatsArchiveStore;
pub use client::{NatsClient, NatsJetStreamPublisher, WorkStreamConfig};
pub use consumer::NatsWorkItemConsumer;
pub use processor::{create_work_item_processor, WorkItemProcessor};
pub use producer::NatsWorkItemProducer;
pub use traits::JetStreamPublisher;

#[cfg(any(test, feature = "testing"))]
pub use traits::MockJetStreamPublisher;
