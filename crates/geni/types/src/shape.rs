//! Shape descriptors for synthesized function signatures.
//!
//! A [`Shape`] plays two roles: its `Display` form is the TypeScript type the
//! prompt and the adapter declaration use, and [`Shape::decode`] checks a JSON
//! value produced by the sandbox against it.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ShapeError;

/// The declared shape of one function argument or of its result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Number,
    String,
    Boolean,
    Null,
    /// Any JSON value; decoding never fails.
    Unknown,
    Array(Box<Shape>),
    Tuple(Vec<Shape>),
    /// Named properties, rendered in declaration order.
    Struct(IndexMap<String, Shape>),
    /// String-keyed map with homogeneous values.
    Record(Box<Shape>),
    /// The inner shape or `null`.
    Optional(Box<Shape>),
}

impl Shape {
    pub fn array(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    pub fn tuple(items: impl IntoIterator<Item = Shape>) -> Self {
        Shape::Tuple(items.into_iter().collect())
    }

    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Shape::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn record(value: Shape) -> Self {
        Shape::Record(Box::new(value))
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    /// The TypeScript type descriptor for this shape.
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// Decode `value` against this shape.
    ///
    /// Struct decoding keeps only the declared properties, in declaration
    /// order; everything else must match exactly.
    pub fn decode(&self, value: &Value) -> Result<Value, ShapeError> {
        self.decode_at(value, "$")
    }

    fn decode_at(&self, value: &Value, path: &str) -> Result<Value, ShapeError> {
        match (self, value) {
            (Shape::Unknown, v) => Ok(v.clone()),
            (Shape::Number, Value::Number(_))
            | (Shape::String, Value::String(_))
            | (Shape::Boolean, Value::Bool(_))
            | (Shape::Null, Value::Null) => Ok(value.clone()),
            (Shape::Optional(_), Value::Null) => Ok(Value::Null),
            (Shape::Optional(inner), v) => inner.decode_at(v, path),
            (Shape::Array(item), Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| item.decode_at(v, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (Shape::Tuple(shapes), Value::Array(items)) => {
                if shapes.len() != items.len() {
                    return Err(ShapeError::Length {
                        path: path.to_string(),
                        expected: shapes.len(),
                        found: items.len(),
                    });
                }
                shapes
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (s, v))| s.decode_at(v, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            (Shape::Struct(fields), Value::Object(object)) => {
                let mut decoded = Map::new();
                for (name, shape) in fields {
                    let field_path = format!("{path}.{name}");
                    match object.get(name) {
                        Some(v) => {
                            decoded.insert(name.clone(), shape.decode_at(v, &field_path)?);
                        }
                        None if matches!(shape, Shape::Optional(_) | Shape::Unknown) => {
                            decoded.insert(name.clone(), Value::Null);
                        }
                        None => {
                            return Err(ShapeError::MissingField {
                                path: path.to_string(),
                                field: name.clone(),
                            })
                        }
                    }
                }
                Ok(Value::Object(decoded))
            }
            (Shape::Record(inner), Value::Object(object)) => {
                let mut decoded = Map::new();
                for (key, v) in object {
                    decoded.insert(key.clone(), inner.decode_at(v, &format!("{path}.{key}"))?);
                }
                Ok(Value::Object(decoded))
            }
            (shape, v) => Err(ShapeError::Mismatch {
                path: path.to_string(),
                expected: shape.to_string(),
                found: json_kind(v).to_string(),
            }),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Number => write!(f, "number"),
            Shape::String => write!(f, "string"),
            Shape::Boolean => write!(f, "boolean"),
            Shape::Null => write!(f, "null"),
            Shape::Unknown => write!(f, "unknown"),
            Shape::Array(item) => write!(f, "ReadonlyArray<{}>", item),
            Shape::Tuple(items) => {
                let rendered: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                write!(f, "readonly [{}]", rendered.join(", "))
            }
            Shape::Struct(fields) => {
                if fields.is_empty() {
                    return write!(f, "{{}}");
                }
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(name, shape)| format!("readonly {}: {}", property_key(name), shape))
                    .collect();
                write!(f, "{{ {} }}", rendered.join("; "))
            }
            Shape::Record(value) => write!(f, "{{ readonly [key: string]: {} }}", value),
            Shape::Optional(inner) => write!(f, "{} | null", inner),
        }
    }
}

/// Property names that are not plain identifiers are written as string
/// literals.
fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
