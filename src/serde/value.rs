use serde_json::{Map, Number, Value};

use crate::types::{ArrayIter, Kind, NodeRef, ObjectIter};

impl<'d> NodeRef<'d> {
    /// Convert this subtree into a `serde_json::Value`.
    ///
    /// Non-finite doubles become `Null`. When an object repeats a key the
    /// first member is kept, matching [`NodeRef::get`]. The conversion uses
    /// an explicit stack, so any depth the reader accepts converts; note that
    /// `serde_json` drops very deep values recursively.
    pub fn to_value(&self) -> Value {
        let mut open: Vec<Building<'d>> = Vec::new();
        let mut node = *self;
        loop {
            let mut finished = match Building::open(node) {
                Some(building) => {
                    open.push(building);
                    None
                }
                None => Some(scalar(node)),
            };
            node = loop {
                let Some(top) = open.last_mut() else {
                    return finished.unwrap_or(Value::Null);
                };
                if let Some(value) = finished.take() {
                    top.accept(value);
                }
                match top.next_child() {
                    Some(child) => break child,
                    None => finished = open.pop().map(Building::finish),
                }
            };
        }
    }
}

fn scalar(node: NodeRef<'_>) -> Value {
    match node.kind() {
        Kind::Bool => Value::Bool(node.as_bool().unwrap_or_default()),
        Kind::Uint => Value::Number(Number::from(node.as_u64().unwrap_or_default())),
        Kind::Int => Value::Number(Number::from(node.as_i64().unwrap_or_default())),
        Kind::Double => node
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Kind::String => Value::String(node.as_str().unwrap_or_default().to_owned()),
        Kind::Null | Kind::Array | Kind::Object => Value::Null,
    }
}

/// A container whose converted children are still being collected.
enum Building<'d> {
    Array {
        elements: ArrayIter<'d>,
        values: Vec<Value>,
    },
    Object {
        members: ObjectIter<'d>,
        key: Option<&'d str>,
        map: Map<String, Value>,
    },
}

impl<'d> Building<'d> {
    fn open(node: NodeRef<'d>) -> Option<Self> {
        match node.kind() {
            Kind::Array => Some(Building::Array {
                elements: node.iter(),
                values: Vec::with_capacity(node.len()),
            }),
            Kind::Object => Some(Building::Object {
                members: node.entries(),
                key: None,
                map: Map::with_capacity(node.len()),
            }),
            _ => None,
        }
    }

    /// Next child to convert. Object members whose key was already taken are skipped.
    fn next_child(&mut self) -> Option<NodeRef<'d>> {
        match self {
            Building::Array { elements, .. } => elements.next(),
            Building::Object { members, key, map } => {
                let (name, value) = members.find(|(name, _)| !map.contains_key(*name))?;
                *key = Some(name);
                Some(value)
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Building::Array { values, .. } => values.push(value),
            Building::Object { key, map, .. } => {
                if let Some(name) = key.take() {
                    map.insert(name.to_owned(), value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Building::Array { values, .. } => Value::Array(values),
            Building::Object { map, .. } => Value::Object(map),
        }
    }
}
