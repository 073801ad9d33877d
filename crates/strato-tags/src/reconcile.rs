use strato_core::{BoxFuture, RemoteError};

use crate::error::TagError;
use crate::set::KeyValueTagSet;
use crate::wire::WireTag;

/// A service exposing separate tag/untag calls that touch only the keys they
/// are given. Unaffected existing tags are left untouched remotely.
pub trait AdditiveTagging: Send + Sync {
    fn tag_resource<'a>(
        &'a self,
        identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>>;

    fn untag_resource<'a>(
        &'a self,
        identifier: &'a str,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), RemoteError>>;
}

/// A service whose only tagging primitive replaces the full set: one call
/// setting the complete desired tags, and a separate call clearing them all.
pub trait ReplaceAllTagging: Send + Sync {
    fn replace_tags<'a>(
        &'a self,
        identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>>;

    fn clear_tags<'a>(&'a self, identifier: &'a str) -> BoxFuture<'a, Result<(), RemoteError>>;
}

/// Tagging call shape a backing service exposes. The reconciler depends only
/// on this; each service picks its variant once, at adapter construction.
pub enum TaggingStyle<'a> {
    Additive(&'a dyn AdditiveTagging),
    ReplaceAll(&'a dyn ReplaceAllTagging),
}

/// Converges remote tag state from `old` to `new` with the minimal calls the
/// service's style allows.
///
/// Both sets must already have ignore/default policy applied; the reconciler
/// has no policy knowledge. Failures surface immediately, annotated with the
/// identifier and direction; a tag failure after a successful untag is
/// surfaced as the tag failure and the completed untag is not rolled back.
pub async fn reconcile(
    style: TaggingStyle<'_>,
    identifier: &str,
    old: &KeyValueTagSet,
    new: &KeyValueTagSet,
) -> Result<(), TagError> {
    let removed = old.removed(new);
    let updated = old.updated(new);

    if removed.is_empty() && updated.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        identifier,
        removed = removed.len(),
        updated = updated.len(),
        "reconciling tags"
    );

    match style {
        TaggingStyle::Additive(service) => {
            if !removed.is_empty() {
                let keys: Vec<String> = removed.keys().map(str::to_string).collect();
                service
                    .untag_resource(identifier, &keys)
                    .await
                    .map_err(|source| TagError::Untag {
                        identifier: identifier.to_string(),
                        source,
                    })?;
            }

            if !updated.is_empty() {
                let tags = updated.to_wire();
                service
                    .tag_resource(identifier, &tags)
                    .await
                    .map_err(|source| TagError::Tag {
                        identifier: identifier.to_string(),
                        source,
                    })?;
            }
        }

        TaggingStyle::ReplaceAll(service) => {
            if new.is_empty() {
                service
                    .clear_tags(identifier)
                    .await
                    .map_err(|source| TagError::Untag {
                        identifier: identifier.to_string(),
                        source,
                    })?;
            } else {
                let tags = new.to_wire();
                service
                    .replace_tags(identifier, &tags)
                    .await
                    .map_err(|source| TagError::Tag {
                        identifier: identifier.to_string(),
                        source,
                    })?;
            }
        }
    }

    Ok(())
}
