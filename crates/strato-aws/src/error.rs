use aws_sdk_waf::error::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use strato_core::RemoteError;
use strato_tags::TagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("creating {label} ({name}): {source}")]
    Create {
        label: &'static str,
        name: String,
        source: RemoteError,
    },

    #[error("reading {label} ({name}): {source}")]
    Read {
        label: &'static str,
        name: String,
        source: RemoteError,
    },

    #[error("updating {label} ({name}): {source}")]
    Update {
        label: &'static str,
        name: String,
        source: RemoteError,
    },

    #[error("deleting {label} ({name}): {source}")]
    Delete {
        label: &'static str,
        name: String,
        source: RemoteError,
    },

    #[error(transparent)]
    Tags(#[from] TagError),
}

impl SyncError {
    pub fn create(label: &'static str, name: &str, source: RemoteError) -> Self {
        Self::Create {
            label,
            name: name.to_string(),
            source,
        }
    }

    pub fn read(label: &'static str, name: &str, source: RemoteError) -> Self {
        Self::Read {
            label,
            name: name.to_string(),
            source,
        }
    }

    pub fn update(label: &'static str, name: &str, source: RemoteError) -> Self {
        Self::Update {
            label,
            name: name.to_string(),
            source,
        }
    }

    pub fn delete(label: &'static str, name: &str, source: RemoteError) -> Self {
        Self::Delete {
            label,
            name: name.to_string(),
            source,
        }
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// SDK errors often have terse `Display` impls (e.g. "service error") but
/// useful detail in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

/// Maps an SDK failure onto the shared taxonomy by service error code.
///
/// Code-string matching is stable across SDK minor versions and works the
/// same for every service client.
pub(crate) fn classify<E>(action: &'static str, err: SdkError<E>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err
        .as_service_error()
        .and_then(|se| se.code())
        .map(str::to_string);
    let detail = format_err_chain(&err);

    match code.as_deref() {
        Some("WAFStaleDataException") => RemoteError::StaleToken(detail),
        Some("WAFReferencedItemException") => RemoteError::ReferentialConflict(detail),
        Some("WAFNonexistentItemException") | Some("NoSuchEntityException") => {
            RemoteError::NotFound(detail)
        }
        _ => RemoteError::other(action, detail),
    }
}
