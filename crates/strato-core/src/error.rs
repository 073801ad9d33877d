use thiserror::Error;

/// Classified outcome of a failed remote control-plane call.
///
/// The retry layers dispatch on this taxonomy without knowing which backing
/// service produced it: stale tokens are retryable inside the change-token
/// mutator, referential conflicts inside the deadline loop, and everything
/// else is fatal to the current operation.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The target resource no longer exists remotely. Callers decide whether
    /// this means already-deleted (idempotent delete) or missing-on-read.
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// The supplied change token no longer represents the head of the
    /// service's serialized mutation queue.
    #[error("stale change token: {0}")]
    StaleToken(String),

    /// A delete was rejected because another object still references the
    /// target.
    #[error("referenced by another object: {0}")]
    ReferentialConflict(String),

    /// Anything else. Fatal to the current operation.
    #[error("{action} failed: {detail}")]
    Other { action: String, detail: String },
}

impl RemoteError {
    pub fn other(action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Other {
            action: action.into(),
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_stale_token(&self) -> bool {
        matches!(self, Self::StaleToken(_))
    }

    pub fn is_referential_conflict(&self) -> bool {
        matches!(self, Self::ReferentialConflict(_))
    }
}
