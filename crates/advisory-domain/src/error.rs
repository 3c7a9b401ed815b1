use thiserror::Error;

/// Failure of the account directory scan.
///
/// The directory is total: it either returns every account or fails. A
/// partial list would silently under-collect with no signal, so there is no
/// partial-success variant.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("account inventory unreachable: {0}")]
    Unreachable(#[source] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to enqueue work item for account {account_id}: {source}")]
    Enqueue {
        account_id: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Error, Debug)]
pub enum FederationError {
    /// The trust relationship rejected the request. A policy problem, not a
    /// transient fault; retrying without operator action cannot succeed.
    #[error("trust denied for role {role_arn}")]
    TrustDenied { role_arn: String },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("credential broker unavailable: {0}")]
    BrokerUnavailable(#[source] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("advisory api unavailable: {0}")]
    ApiUnavailable(#[source] anyhow::Error),

    /// The account's support tier does not grant access to the requested
    /// check data.
    #[error("advisory checks unsupported for this support tier")]
    UnsupportedTier,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("archive sink unavailable: {0}")]
    SinkUnavailable(#[source] anyhow::Error),

    #[error("archive write permission denied")]
    PermissionDenied,
}

/// Any failure of a single collection invocation. The message stays
/// unacknowledged on the queue, so redelivery is bounded by the queue's
/// max-deliver policy rather than anything here.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("federation failed: {0}")]
    Federation(#[from] FederationError),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("report encoding failed: {0}")]
    Encode(#[source] anyhow::Error),
}

impl CollectError {
    /// The pipeline stage that failed, for structured logging.
    pub fn stage(&self) -> &'static str {
        match self {
            CollectError::Federation(_) => "federate",
            CollectError::Retrieval(_) => "retrieve",
            CollectError::Upload(_) => "upload",
            CollectError::Encode(_) => "serialize",
        }
    }
}
