use strato_core::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag key must not be empty")]
    EmptyKey,

    #[error("tagging resource ({identifier}): {source}")]
    Tag {
        identifier: String,
        source: RemoteError,
    },

    #[error("untagging resource ({identifier}): {source}")]
    Untag {
        identifier: String,
        source: RemoteError,
    },
}
