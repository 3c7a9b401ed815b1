use advisory_domain::{ArchiveStore, UploadError};
use anyhow::{Context, Result};
use async_nats::jetstream;
use async_nats::jetstream::object_store::InfoErrorKind;
use async_trait::async_trait;
use tracing::debug;

/// Archive backed by a JetStream object store bucket.
///
/// Keys are `{date}/{account_label}.csv`; a put overwrites any existing
/// object at the same key, so a duplicate collection for the same day is
/// last-write-wins rather than an append.
pub struct NatsArchiveStore {
    store: jetstream::object_store::ObjectStore,
}

impl NatsArchiveStore {
    pub async fn new(jetstream: &jetstream::Context, bucket_name: &str) -> Result<Self> {
        debug!(bucket = %bucket_name, "initializing archive store");

        let store = match jetstream.get_object_store(bucket_name).await {
            Ok(store) => {
                debug!(bucket = %bucket_name, "archive bucket already exists");
                store
            }
            Err(_) => {
                debug!(bucket = %bucket_name, "creating archive bucket");
                jetstream
                    .create_object_store(jetstream::object_store::Config {
                        bucket: bucket_name.to_string(),
                        ..Default::default()
                    })
                    .await
                    .context("failed to create archive bucket")?
            }
        };

        Ok(Self { store })
    }
}

#[async_trait]
impl ArchiveStore for NatsArchiveStore {
    async fn upload(&self, key: &str, content: bytes::Bytes) -> Result<(), UploadError> {
        let mut reader = &content[..];
        self.store
            .put(key, &mut reader)
            .await
            .map_err(|e| UploadError::SinkUnavailable(anyhow::Error::new(e)))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, UploadError> {
        match self.store.info(key).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == InfoErrorKind::NotFound => Ok(false),
            Err(err) => Err(UploadError::SinkUnavailable(anyhow::Error::new(err))),
        }
    }
}
