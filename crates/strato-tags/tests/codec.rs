use std::collections::BTreeSet;

use strato_tags::{KeyValueTagSet, WireTag};

fn set(pairs: &[(&str, &str)]) -> KeyValueTagSet {
    KeyValueTagSet::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string()))),
    )
    .unwrap()
}

#[test]
fn wire_round_trip_is_set_equal() {
    let original = set(&[("Name", "web"), ("env", "prod"), ("team", "infra")]);

    let decoded = KeyValueTagSet::from_wire(original.to_wire());
    assert_eq!(decoded, original);
}

#[test]
fn encode_emits_one_record_per_key() {
    let tags = set(&[("a", "1"), ("b", "2")]);

    // Compare as a set; record order is not semantically significant.
    let wire: BTreeSet<(String, Option<String>)> = tags
        .to_wire()
        .into_iter()
        .map(|t| (t.key, t.value))
        .collect();
    let expected: BTreeSet<(String, Option<String>)> = [
        ("a".to_string(), Some("1".to_string())),
        ("b".to_string(), Some("2".to_string())),
    ]
    .into_iter()
    .collect();
    assert_eq!(wire, expected);
}

#[test]
fn duplicate_keys_decode_last_write_wins() {
    let decoded = KeyValueTagSet::from_wire([
        WireTag::new("k", "1".to_string()),
        WireTag::new("k", "2".to_string()),
    ]);

    assert_eq!(decoded.len(), 1);
    assert_eq!(
        decoded.get("k").unwrap().value.as_deref(),
        Some("2")
    );
}

#[test]
fn valueless_wire_tag_survives_decode() {
    let decoded = KeyValueTagSet::from_wire([WireTag::new("k", None)]);

    assert!(decoded.contains_key("k"));
    assert_eq!(decoded.get("k").unwrap().value, None);
}

#[test]
fn empty_wire_key_is_dropped_not_fatal() {
    let decoded = KeyValueTagSet::from_wire([
        WireTag::new("", "ghost".to_string()),
        WireTag::new("k", "1".to_string()),
    ]);

    assert_eq!(decoded, set(&[("k", "1")]));
}
