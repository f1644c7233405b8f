use arenajson::{from_str, parse, ReadFlags, ReadOptions};
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case(r#"{"title": "t", "entries": [{"id": 1, "ok": true}, {"id": 2, "ok": false}]}"#)]
#[case(r#"[0, -1, 1.5, -1e-7, 18446744073709551615, -9223372036854775808]"#)]
#[case(r#"["\u00e9", "\ud83d\ude00", "\"quoted\"", "back\\slash", "\u0001"]"#)]
#[case(r#"{"nested": {"deeper": {"deepest": [[], {}, [null]]}}}"#)]
fn serialize_and_read_again(#[case] input: &str) {
    let document = from_str(input).unwrap();
    let written = serde_json::to_string(&document).unwrap();
    let again = from_str(&written).unwrap();
    assert_eq!(document.root(), again.root(), "{written}");
}

#[rstest]
fn negative_zero_integer_comes_back_unsigned() {
    let document = from_str("[-0, -0.0]").unwrap();
    let root = document.root();
    assert_eq!(root.at(0).and_then(|v| v.as_i64()), Some(0));

    let written = serde_json::to_string(&document).unwrap();
    assert_eq!(written, "[0,-0.0]");
    let again = from_str(&written).unwrap();
    assert_eq!(again.root().at(0).and_then(|v| v.as_u64()), Some(0));
    assert_eq!(again.root().at(1).unwrap(), root.at(1).unwrap());
    assert_ne!(again.root(), root);
}

#[rstest]
fn agrees_with_serde_json() {
    let input = r#"{"a": [1, -2, 3.25, "x", null, true], "b": {"c": "\n"}}"#;
    let document = from_str(input).unwrap();
    let expected: Value = serde_json::from_str(input).unwrap();
    assert_eq!(document.to_value(), expected);
    let written: Value = serde_json::from_str(&serde_json::to_string(&document).unwrap()).unwrap();
    assert_eq!(written, expected);
}

#[rstest]
fn subtree_serializes_alone() {
    let document = from_str(r#"{"keep": {"x": [1, 2]}, "drop": 0}"#).unwrap();
    let keep = document.root().get("keep").unwrap();
    assert_eq!(serde_json::to_string(&keep).unwrap(), r#"{"x":[1,2]}"#);
}

#[rstest]
fn relaxed_input_serializes_as_strict_json() {
    let input = b"// c\n{\"a\": [1, 2,], \"b\": inf,}";
    let document = parse(input, &ReadOptions::relaxed()).unwrap();
    assert_eq!(
        serde_json::to_string(&document).unwrap(),
        r#"{"a":[1,2],"b":null}"#
    );
}

#[rstest]
fn reads_are_deterministic() {
    let input = br#"{"z": [3, 2, 1], "a": {"k": "v", "k": "w"}, "m": 0.1}"#;
    let options = ReadOptions::new().with_flag(ReadFlags::STOP_WHEN_DONE);
    let first = parse(input, &options).unwrap();
    let second = parse(input, &options).unwrap();
    assert_eq!(first.root(), second.root());
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.bytes_read(), second.bytes_read());
}
