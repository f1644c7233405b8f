use arenajson::{from_str, Kind};
use rstest::rstest;

const FEED: &str = r#"{
    "title": "Release notes",
    "entries": [
        {"id": 1, "title": "first", "tags": ["a", "b"]},
        {"id": 2, "title": "second", "tags": []},
        {"id": 3, "title": "third", "draft": true}
    ],
    "meta": {"count": 3, "ratio": 0.75, "owner": null}
}"#;

#[rstest]
fn read_title_and_entries() {
    let document = from_str(FEED).unwrap();
    let root = document.root();
    assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("Release notes"));

    let entries = root.get("entries").unwrap();
    assert_eq!(entries.kind(), Kind::Array);
    assert_eq!(entries.len(), 3);
    let titles: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry.get("title")?.as_str())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[rstest]
fn object_members_in_document_order() {
    let document = from_str(FEED).unwrap();
    let keys: Vec<&str> = document.root().entries().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["title", "entries", "meta"]);
}

#[rstest]
fn first_last_and_index() {
    let document = from_str(FEED).unwrap();
    let entries = document.root().get("entries").unwrap();
    assert_eq!(entries.first().and_then(|e| e.get("id")?.as_u64()), Some(1));
    assert_eq!(entries.last().and_then(|e| e.get("id")?.as_u64()), Some(3));
    assert!(entries.at(3).is_none());
    assert!(entries.at(1).unwrap().get("tags").unwrap().is_empty());
}

#[rstest]
#[case("/title", Kind::String)]
#[case("/entries/0/tags/1", Kind::String)]
#[case("/entries/2/draft", Kind::Bool)]
#[case("/meta/count", Kind::Uint)]
#[case("/meta/ratio", Kind::Double)]
#[case("/meta/owner", Kind::Null)]
fn pointer_lookup(#[case] pointer: &str, #[case] kind: Kind) {
    let document = from_str(FEED).unwrap();
    assert_eq!(document.pointer(pointer).map(|v| v.kind()), Some(kind));
}

#[rstest]
fn missing_members_are_none() {
    let document = from_str(FEED).unwrap();
    let root = document.root();
    assert!(root.get("missing").is_none());
    assert!(root.get("title").unwrap().get("x").is_none());
    assert!(document.pointer("/entries/1/draft").is_none());
    assert!(document.pointer("/meta/owner").unwrap().as_str().is_none());
}

#[rstest]
fn duplicate_keys_are_kept() {
    let document = from_str(r#"{"k": 1, "other": 0, "k": 2}"#).unwrap();
    let root = document.root();
    assert_eq!(root.len(), 3);
    assert_eq!(root.get("k").and_then(|v| v.as_u64()), Some(1));
    let all: Vec<u64> = root
        .entries()
        .filter(|(key, _)| *key == "k")
        .filter_map(|(_, value)| value.as_u64())
        .collect();
    assert_eq!(all, vec![1, 2]);
}

#[rstest]
fn node_count_covers_every_value() {
    let document = from_str(r#"[1, [2, 3], {"a": {}}]"#).unwrap();
    assert_eq!(document.node_count(), 7);
}

#[rstest]
fn handles_outlive_iteration() {
    let document = from_str("[[1], [2]]").unwrap();
    let inner: Vec<_> = document.root().iter().collect();
    let values: Vec<u64> = inner.iter().filter_map(|v| v.first()?.as_u64()).collect();
    assert_eq!(values, vec![1, 2]);
}
