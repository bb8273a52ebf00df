use gs_math::Vec3;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::diagnostic::{Diagnostic, Diagnostics};

/// A persisted value. The tag can be read off the document alone, but turning a value back into a
/// field always goes through the field's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    Vector3(Vec3),
    Array(Vec<Value>),
    /// A reference to another entity (or a component on it) by the entity's name. Written as a
    /// plain string, so it reads back as [`Value::String`].
    EntityRef(String),
    String(String),
}

impl Value {
    pub fn tag_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Vector3(_) => "vector3",
            Value::Array(_) => "array",
            Value::EntityRef(_) => "entity reference",
            Value::String(_) => "string",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text carried by a string or a reference.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::String(name) | Value::EntityRef(name) => Some(name),
            _ => None,
        }
    }

    /// Converts a parsed document node into a value. Objects are only understood as `{x, y, z}`
    /// coordinates; any other object is reported and `None` is returned so the caller can skip
    /// the entry. Malformed array elements become `Null` to keep the array length.
    pub fn from_tree(
        tree: serde_json::Value,
        path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<Value> {
        match tree {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(b)),
            serde_json::Value::Number(n) => Some(number_to_value(&n)),
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => Some(Value::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        Value::from_tree(item, &format!("{path}[{i}]"), diagnostics)
                            .unwrap_or(Value::Null)
                    })
                    .collect(),
            )),
            serde_json::Value::Object(_) => match vec3_from_tree(&tree) {
                Some(v) => Some(Value::Vector3(v)),
                None => {
                    diagnostics.push(Diagnostic::MalformedEntry {
                        path: path.to_owned(),
                        reason: "objects must be coordinates with numeric 'x', 'y' and 'z'".into(),
                    });
                    None
                }
            },
        }
    }
}

fn number_to_value(n: &serde_json::Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        // Integers past `i64::MAX` and everything with a fraction.
        None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Reads `{x, y, z}` out of an object node. Integer components are accepted.
pub(crate) fn vec3_from_tree(tree: &serde_json::Value) -> Option<Vec3> {
    let obj = tree.as_object()?;
    let x = obj.get("x")?.as_f64()?;
    let y = obj.get("y")?.as_f64()?;
    let z = obj.get("z")?.as_f64()?;
    Some(Vec3::new(x as f32, y as f32, z as f32))
}

/// Writes a coordinate triple as `{"x": .., "y": .., "z": ..}` using `f32` precision.
pub(crate) struct SerVec3<'a>(pub &'a Vec3);

impl<'a> Serialize for SerVec3<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("x", &self.0.x)?;
        map.serialize_entry("y", &self.0.y)?;
        map.serialize_entry("z", &self.0.z)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::Vector3(v) => SerVec3(v).serialize(serializer),
            Value::Array(items) => items.serialize(serializer),
            Value::EntityRef(name) | Value::String(name) => serializer.serialize_str(name),
        }
    }
}
