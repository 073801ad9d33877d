use aws_sdk_inspector::Client;
use strato_tags::{reconcile, KeyValueTagSet, TaggingStyle};

use crate::error::SyncError;
use crate::tags::AssessmentTags;

/// Converges the tags on an Inspector assessment template.
///
/// The API has no partial-update primitive, so the full desired set is
/// written whenever anything changed, and an emptied set becomes the clear
/// call.
pub async fn update_assessment_tags(
    client: &Client,
    arn: &str,
    old: &KeyValueTagSet,
    new: &KeyValueTagSet,
) -> Result<(), SyncError> {
    let service = AssessmentTags::new(client.clone());
    reconcile(
        TaggingStyle::ReplaceAll(&service),
        arn,
        &old.ignore_aws(),
        &new.ignore_aws(),
    )
    .await?;
    Ok(())
}
