use aws_sdk_inspector::types::Tag as InspectorSdkTag;
use aws_sdk_inspector::Client as InspectorClient;
use aws_sdk_waf::types::Tag as WafSdkTag;
use aws_sdk_waf::Client as WafClient;
use strato_core::{BoxFuture, RemoteError};
use strato_tags::{AdditiveTagging, KeyValueTagSet, ReplaceAllTagging, WireTag};

use crate::error::classify;

pub(crate) fn waf_sdk_tags(
    tags: &[WireTag],
    action: &'static str,
) -> Result<Vec<WafSdkTag>, RemoteError> {
    tags.iter()
        .map(|t| {
            WafSdkTag::builder()
                .key(t.key.as_str())
                // The service requires a value; a value-less tag is sent as
                // the empty string.
                .value(t.value.clone().unwrap_or_default())
                .build()
                .map_err(|err| RemoteError::other(action, err.to_string()))
        })
        .collect()
}

pub(crate) fn waf_wire_tags(tags: &[WafSdkTag]) -> Vec<WireTag> {
    tags.iter()
        .map(|t| WireTag::new(t.key(), Some(t.value().to_string())))
        .collect()
}

fn inspector_sdk_tags(
    tags: &[WireTag],
    action: &'static str,
) -> Result<Vec<InspectorSdkTag>, RemoteError> {
    tags.iter()
        .map(|t| {
            InspectorSdkTag::builder()
                .key(t.key.as_str())
                .set_value(t.value.clone())
                .build()
                .map_err(|err| RemoteError::other(action, err.to_string()))
        })
        .collect()
}

/// Additive tagging over the classic WAF API: `TagResource` and
/// `UntagResource` touch only the keys they are given.
pub struct WafTags {
    client: WafClient,
}

impl WafTags {
    pub fn new(client: WafClient) -> Self {
        Self { client }
    }

    /// Lists the resource's current tags.
    pub async fn list(&self, arn: &str) -> Result<KeyValueTagSet, RemoteError> {
        let out = self
            .client
            .list_tags_for_resource()
            .resource_arn(arn)
            .send()
            .await
            .map_err(|err| classify("waf:ListTagsForResource", err))?;

        let tags = out
            .tag_info_for_resource()
            .map(|info| info.tag_list())
            .unwrap_or_default();
        Ok(KeyValueTagSet::from_wire(waf_wire_tags(tags)))
    }
}

impl AdditiveTagging for WafTags {
    fn tag_resource<'a>(
        &'a self,
        identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let sdk_tags = waf_sdk_tags(tags, "waf:TagResource")?;
            self.client
                .tag_resource()
                .resource_arn(identifier)
                .set_tags(Some(sdk_tags))
                .send()
                .await
                .map(|_| ())
                .map_err(|err| classify("waf:TagResource", err))
        })
    }

    fn untag_resource<'a>(
        &'a self,
        identifier: &'a str,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.client
                .untag_resource()
                .resource_arn(identifier)
                .set_tag_keys(Some(keys.to_vec()))
                .send()
                .await
                .map(|_| ())
                .map_err(|err| classify("waf:UntagResource", err))
        })
    }
}

/// Replace-all tagging over the Inspector API: `SetTagsForResource` always
/// carries the complete desired set, and clearing is the same call with no
/// tag payload.
pub struct AssessmentTags {
    client: InspectorClient,
}

impl AssessmentTags {
    pub fn new(client: InspectorClient) -> Self {
        Self { client }
    }
}

impl ReplaceAllTagging for AssessmentTags {
    fn replace_tags<'a>(
        &'a self,
        identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let sdk_tags = inspector_sdk_tags(tags, "inspector:SetTagsForResource")?;
            self.client
                .set_tags_for_resource()
                .resource_arn(identifier)
                .set_tags(Some(sdk_tags))
                .send()
                .await
                .map(|_| ())
                .map_err(|err| classify("inspector:SetTagsForResource", err))
        })
    }

    fn clear_tags<'a>(&'a self, identifier: &'a str) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.client
                .set_tags_for_resource()
                .resource_arn(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| classify("inspector:SetTagsForResource", err))
        })
    }
}
