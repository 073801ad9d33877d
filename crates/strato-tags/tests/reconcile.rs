use std::sync::Mutex;

use strato_core::{BoxFuture, RemoteError};
use strato_tags::{
    reconcile, AdditiveTagging, KeyValueTagSet, ReplaceAllTagging, TagError, TaggingStyle, WireTag,
};

fn set(pairs: &[(&str, &str)]) -> KeyValueTagSet {
    KeyValueTagSet::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string()))),
    )
    .unwrap()
}

#[derive(Debug, PartialEq, Eq)]
enum Call {
    Tag(Vec<(String, Option<String>)>),
    Untag(Vec<String>),
    Replace(Vec<(String, Option<String>)>),
    Clear,
}

fn pairs(tags: &[WireTag]) -> Vec<(String, Option<String>)> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

#[derive(Default)]
struct RecordingService {
    calls: Mutex<Vec<Call>>,
    fail_tag: bool,
}

impl RecordingService {
    fn failing_tag() -> Self {
        Self {
            fail_tag: true,
            ..Self::default()
        }
    }

    fn calls(self) -> Vec<Call> {
        self.calls.into_inner().unwrap()
    }
}

impl AdditiveTagging for RecordingService {
    fn tag_resource<'a>(
        &'a self,
        _identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Tag(pairs(tags)));
            if self.fail_tag {
                return Err(RemoteError::other("tag", "service unavailable"));
            }
            Ok(())
        })
    }

    fn untag_resource<'a>(
        &'a self,
        _identifier: &'a str,
        keys: &'a [String],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Untag(keys.to_vec()));
            Ok(())
        })
    }
}

impl ReplaceAllTagging for RecordingService {
    fn replace_tags<'a>(
        &'a self,
        _identifier: &'a str,
        tags: &'a [WireTag],
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Replace(pairs(tags)));
            Ok(())
        })
    }

    fn clear_tags<'a>(&'a self, _identifier: &'a str) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Clear);
            Ok(())
        })
    }
}

#[tokio::test]
async fn identical_sets_issue_zero_remote_calls() {
    let service = RecordingService::default();
    let tags = set(&[("a", "1"), ("b", "2")]);

    reconcile(TaggingStyle::Additive(&service), "arn:r", &tags, &tags)
        .await
        .unwrap();

    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn additive_untags_removed_keys_then_tags_changes() {
    let service = RecordingService::default();
    let old = set(&[("a", "1"), ("b", "2")]);
    let new = set(&[("b", "3"), ("c", "4")]);

    reconcile(TaggingStyle::Additive(&service), "arn:r", &old, &new)
        .await
        .unwrap();

    assert_eq!(
        service.calls(),
        vec![
            Call::Untag(vec!["a".to_string()]),
            Call::Tag(vec![
                ("b".to_string(), Some("3".to_string())),
                ("c".to_string(), Some("4".to_string())),
            ]),
        ]
    );
}

#[tokio::test]
async fn additive_skips_untag_when_nothing_was_removed() {
    let service = RecordingService::default();
    let old = set(&[("a", "1")]);
    let new = set(&[("a", "1"), ("b", "2")]);

    reconcile(TaggingStyle::Additive(&service), "arn:r", &old, &new)
        .await
        .unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::Tag(vec![("b".to_string(), Some("2".to_string()))])]
    );
}

#[tokio::test]
async fn additive_skips_tag_when_only_removals_remain() {
    let service = RecordingService::default();
    let old = set(&[("a", "1"), ("b", "2")]);
    let new = set(&[("b", "2")]);

    reconcile(TaggingStyle::Additive(&service), "arn:r", &old, &new)
        .await
        .unwrap();

    assert_eq!(service.calls(), vec![Call::Untag(vec!["a".to_string()])]);
}

#[tokio::test]
async fn tag_failure_after_successful_untag_surfaces_with_direction() {
    let service = RecordingService::failing_tag();
    let old = set(&[("a", "1"), ("b", "2")]);
    let new = set(&[("b", "3")]);

    let err = reconcile(TaggingStyle::Additive(&service), "arn:r", &old, &new)
        .await
        .unwrap_err();

    match err {
        TagError::Tag { identifier, .. } => assert_eq!(identifier, "arn:r"),
        other => panic!("expected tagging error, got {other}"),
    }
    // The untag that already completed is not rolled back.
    let calls = service.calls();
    assert_eq!(calls[0], Call::Untag(vec!["a".to_string()]));
}

#[tokio::test]
async fn replace_all_sends_the_full_desired_set() {
    let service = RecordingService::default();
    let old = set(&[("a", "1"), ("b", "2")]);
    let new = set(&[("b", "3"), ("c", "4")]);

    reconcile(TaggingStyle::ReplaceAll(&service), "arn:r", &old, &new)
        .await
        .unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::Replace(vec![
            ("b".to_string(), Some("3".to_string())),
            ("c".to_string(), Some("4".to_string())),
        ])]
    );
}

#[tokio::test]
async fn replace_all_clears_when_desired_set_becomes_empty() {
    let service = RecordingService::default();
    let old = set(&[("a", "1")]);
    let new = KeyValueTagSet::default();

    reconcile(TaggingStyle::ReplaceAll(&service), "arn:r", &old, &new)
        .await
        .unwrap();

    // A clear call, never a replace with an empty payload.
    assert_eq!(service.calls(), vec![Call::Clear]);
}

#[tokio::test]
async fn replace_all_on_two_empty_sets_is_a_no_op() {
    let service = RecordingService::default();
    let empty = KeyValueTagSet::default();

    reconcile(TaggingStyle::ReplaceAll(&service), "arn:r", &empty, &empty)
        .await
        .unwrap();

    assert!(service.calls().is_empty());
}
