use ::serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::constants::MAX_WRITE_DEPTH;
use crate::types::{Document, Kind, NodeRef};

/// Writes the tree back out through any serde serializer. Objects keep every
/// member in document order, duplicates included, so `serde_json::to_string`
/// reproduces the document modulo whitespace and number spelling.
///
/// Containers nested deeper than [`MAX_WRITE_DEPTH`] fail with a custom
/// serializer error.
impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            node: *self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

struct Nested<'d> {
    node: NodeRef<'d>,
    depth: usize,
}

impl<'d> Nested<'d> {
    fn child(&self, node: NodeRef<'d>) -> Nested<'d> {
        Nested {
            node,
            depth: self.depth + 1,
        }
    }
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        match node.kind() {
            Kind::Null => serializer.serialize_unit(),
            Kind::Bool => serializer.serialize_bool(node.as_bool().unwrap_or_default()),
            Kind::Uint => serializer.serialize_u64(node.as_u64().unwrap_or_default()),
            Kind::Int => serializer.serialize_i64(node.as_i64().unwrap_or_default()),
            Kind::Double => serializer.serialize_f64(node.as_f64().unwrap_or_default()),
            Kind::String => serializer.serialize_str(node.as_str().unwrap_or_default()),
            Kind::Array | Kind::Object if self.depth >= MAX_WRITE_DEPTH => Err(S::Error::custom(
                format_args!("nesting deeper than {MAX_WRITE_DEPTH} levels"),
            )),
            Kind::Array => {
                let mut seq = serializer.serialize_seq(Some(node.len()))?;
                for element in node.iter() {
                    seq.serialize_element(&self.child(element))?;
                }
                seq.end()
            }
            Kind::Object => {
                let mut map = serializer.serialize_map(Some(node.len()))?;
                for (key, value) in node.entries() {
                    map.serialize_entry(key, &self.child(value))?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::MAX_WRITE_DEPTH;
    use crate::{from_str, parse, ReadFlags, ReadOptions};

    fn nested_arrays(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[rstest::rstest]
    #[case(r#"{"a":[1,-2,0.5,"x\ny",null,true,{}]}"#)]
    #[case(r#"[18446744073709551615,-9223372036854775808]"#)]
    #[case(r#"{"k":1,"k":2}"#)]
    #[case(r#""é""#)]
    fn test_to_string_reproduces_compact_input(#[case] input: &str) {
        let document = from_str(input).unwrap();
        assert_eq!(serde_json::to_string(&document).unwrap(), input);
    }

    #[rstest::rstest]
    fn test_non_finite_becomes_null() {
        let options = ReadOptions::new().with_flag(ReadFlags::ALLOW_INF_AND_NAN);
        let document = parse(b"[Infinity, -inf, NaN]", &options).unwrap();
        assert_eq!(serde_json::to_string(&document).unwrap(), "[null,null,null]");
    }

    #[rstest::rstest]
    fn test_depth_limit_is_an_error() {
        let document = from_str(&nested_arrays(200_000)).unwrap();
        let err = serde_json::to_string(&document).unwrap_err();
        assert!(err.to_string().contains("nesting deeper than"), "{err}");
    }

    #[rstest::rstest]
    fn test_nesting_up_to_limit_serializes() {
        let input = nested_arrays(MAX_WRITE_DEPTH);
        let document = from_str(&input).unwrap();
        assert_eq!(serde_json::to_string(&document).unwrap(), input);

        let deeper = from_str(&nested_arrays(MAX_WRITE_DEPTH + 1)).unwrap();
        assert!(serde_json::to_string(&deeper).is_err());
    }
}
