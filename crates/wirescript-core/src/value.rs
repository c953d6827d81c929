//! Runtime values.
//!
//! [`Value`] is what script functions produce and what overrides supply.
//! Plain data (scalars, arrays, dictionaries) can be written back out as a
//! script literal; [`Value::Object`] is an opaque handle that only compares
//! by identity and never has a literal form.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::NonSerializable;

/// Monotonic identity source for opaque objects.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Floating point value (uses OrderedFloat so values compare totally)
    Float(OrderedFloat<f64>),
    String(String),
    Array(Vec<Value>),
    /// Dictionary with string keys, kept in insertion order
    Dict(IndexMap<String, Value>),
    /// Opaque object instance
    Object(ObjectHandle),
}

impl Value {
    /// Shorthand for a float value.
    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    /// Allocate a fresh opaque object with a new identity.
    pub fn new_object(class: impl Into<String>) -> Self {
        Value::Object(ObjectHandle::new(class))
    }

    /// Name of this value's type, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Object(_) => "object",
        }
    }

    /// Truthiness used by conditions and logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => f.0 != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::Object(_) => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value as script source that evaluates back to it.
    ///
    /// Only the shapes enabled in `shapes` are accepted. Objects and
    /// non-finite floats never have a literal form.
    pub fn to_literal(&self, shapes: SerializableShapes) -> Result<String, NonSerializable> {
        let mut out = String::new();
        self.write_literal(&mut out, shapes, 0)?;
        Ok(out)
    }

    fn write_literal(
        &self,
        out: &mut String,
        shapes: SerializableShapes,
        depth: usize,
    ) -> Result<(), NonSerializable> {
        let shape = self.shape();
        if !shapes.contains(shape) {
            return Err(NonSerializable::ShapeNotAllowed {
                shape: self.type_name(),
            });
        }
        if depth > 0 && shape.intersects(SerializableShapes::AGGREGATES)
            && !shapes.contains(SerializableShapes::NESTED)
        {
            return Err(NonSerializable::ShapeNotAllowed { shape: "nested aggregate" });
        }

        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            // The lexer reads a sign as an operator, and the magnitude of
            // i64::MIN does not fit in an i64 literal.
            Value::Int(i64::MIN) => out.push_str("(-9223372036854775807 - 1)"),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => {
                if !f.0.is_finite() {
                    return Err(NonSerializable::NonFinite { value: f.0 });
                }
                out.push_str(&format!("{:?}", f.0));
            }
            Value::String(s) => write_quoted(out, s),
            Value::Array(items) => {
                check_homogeneous(items.iter(), shapes)?;
                out.push('{');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_literal(out, shapes, depth + 1)?;
                }
                out.push('}');
            }
            Value::Dict(entries) => {
                if entries.is_empty() {
                    out.push_str("{:}");
                    return Ok(());
                }
                check_homogeneous(entries.values(), shapes)?;
                out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_quoted(out, key);
                    out.push_str(": ");
                    item.write_literal(out, shapes, depth + 1)?;
                }
                out.push('}');
            }
            Value::Object(handle) => {
                return Err(NonSerializable::Opaque {
                    class: handle.class().to_string(),
                });
            }
        }
        Ok(())
    }

    fn shape(&self) -> SerializableShapes {
        match self {
            Value::Null => SerializableShapes::NULL,
            Value::Bool(_) => SerializableShapes::BOOL,
            Value::Int(_) => SerializableShapes::INT,
            Value::Float(_) => SerializableShapes::FLOAT,
            Value::String(_) => SerializableShapes::STRING,
            Value::Array(_) => SerializableShapes::ARRAY,
            Value::Dict(_) => SerializableShapes::DICT,
            Value::Object(_) => SerializableShapes::empty(),
        }
    }
}

fn check_homogeneous<'a>(
    mut items: impl Iterator<Item = &'a Value>,
    shapes: SerializableShapes,
) -> Result<(), NonSerializable> {
    if shapes.contains(SerializableShapes::MIXED) {
        return Ok(());
    }
    let Some(first) = items.next() else {
        return Ok(());
    };
    let kind = std::mem::discriminant(first);
    if items.all(|item| std::mem::discriminant(item) == kind) {
        Ok(())
    } else {
        Err(NonSerializable::ShapeNotAllowed {
            shape: "mixed aggregate",
        })
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{:?}", v.0),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
            Value::Object(handle) => write!(f, "{handle}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

// ============================================================================
// Opaque objects
// ============================================================================

#[derive(Debug)]
struct ObjectData {
    id: u64,
    class: String,
}

/// Shared handle to an opaque object.
///
/// Clones share identity; two separately created objects never compare equal.
#[derive(Clone)]
pub struct ObjectHandle(Rc<ObjectData>);

impl ObjectHandle {
    pub fn new(class: impl Into<String>) -> Self {
        Self(Rc::new(ObjectData {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: class.into(),
        }))
    }

    /// Identity of the object, unique for the lifetime of the process.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectHandle {}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({} #{})", self.0.class, self.0.id)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} #{}>", self.0.class, self.0.id)
    }
}

// ============================================================================
// Serializable shapes
// ============================================================================

bitflags! {
    /// Whitelist of value shapes that have a trivial literal form.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SerializableShapes: u16 {
        const NULL = 1 << 0;
        const BOOL = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const ARRAY = 1 << 5;
        const DICT = 1 << 6;
        /// Aggregates may contain other aggregates.
        const NESTED = 1 << 7;
        /// Aggregate elements may differ in type.
        const MIXED = 1 << 8;

        const SCALARS = Self::NULL.bits() | Self::BOOL.bits() | Self::INT.bits()
            | Self::FLOAT.bits() | Self::STRING.bits();
        const AGGREGATES = Self::ARRAY.bits() | Self::DICT.bits();
    }
}

impl Default for SerializableShapes {
    fn default() -> Self {
        SerializableShapes::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: &[(&str, Value)]) -> Value {
        Value::Dict(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn scalar_literals() {
        let all = SerializableShapes::all();
        assert_eq!(Value::Null.to_literal(all).unwrap(), "null");
        assert_eq!(Value::Bool(true).to_literal(all).unwrap(), "true");
        assert_eq!(Value::Int(-42).to_literal(all).unwrap(), "-42");
        assert_eq!(Value::float(2.0).to_literal(all).unwrap(), "2.0");
        assert_eq!(Value::float(1e100).to_literal(all).unwrap(), "1e100");
        assert_eq!(
            Value::from("say \"hi\"\n").to_literal(all).unwrap(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn aggregate_literals() {
        let all = SerializableShapes::all();
        let list = Value::from(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.to_literal(all).unwrap(), "{1, 2}");
        assert_eq!(Value::Array(vec![]).to_literal(all).unwrap(), "{}");
        assert_eq!(dict(&[]).to_literal(all).unwrap(), "{:}");
        assert_eq!(
            dict(&[("a", Value::Int(1)), ("b", list)]).to_literal(all).unwrap(),
            r#"{"a": 1, "b": {1, 2}}"#
        );
    }

    #[test]
    fn objects_are_never_serializable() {
        let obj = Value::new_object("object");
        let err = obj.to_literal(SerializableShapes::all()).unwrap_err();
        assert!(matches!(err, NonSerializable::Opaque { .. }));

        let wrapped = Value::from(vec![obj]);
        assert!(wrapped.to_literal(SerializableShapes::all()).is_err());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let err = Value::float(f64::NAN)
            .to_literal(SerializableShapes::all())
            .unwrap_err();
        assert!(matches!(err, NonSerializable::NonFinite { .. }));
    }

    #[test]
    fn whitelist_restricts_shapes() {
        let scalars = SerializableShapes::SCALARS;
        assert!(Value::Int(1).to_literal(scalars).is_ok());
        assert!(Value::from(vec![Value::Int(1)]).to_literal(scalars).is_err());

        let flat = SerializableShapes::SCALARS | SerializableShapes::ARRAY;
        let nested = Value::from(vec![Value::from(vec![Value::Int(1)])]);
        assert!(nested.to_literal(flat).is_err());
        assert!(nested.to_literal(flat | SerializableShapes::NESTED).is_ok());

        let mixed = Value::from(vec![Value::Int(1), Value::from("a")]);
        assert!(mixed.to_literal(flat).is_err());
        assert!(mixed.to_literal(flat | SerializableShapes::MIXED).is_ok());
    }

    #[test]
    fn object_identity() {
        let a = Value::new_object("object");
        let b = Value::new_object("object");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
    }
}
