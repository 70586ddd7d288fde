//! Runtime value model for the tokenizer
//!
//! `Value` is a closed tagged-variant representation of an arbitrary value:
//! primitives, records, pointers, sequences, mappings, boxed dynamic values,
//! channels and functions. It is the adapter layer between caller data and
//! the kind-dispatched tokenizer walk.

use std::fmt;

/// An arbitrary value, described by its runtime kind.
///
/// Map pairs are kept in insertion order, so tokenization of values
/// containing maps is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An invalid or absent value.
    Nil,
    Str(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// A record with named fields in declaration order.
    Struct {
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// A nullable reference; `None` is a nil pointer.
    Ptr(Option<Box<Value>>),
    /// A sequence tagged with its element type name; `None` is a nil slice.
    Slice {
        elem: String,
        items: Option<Vec<Value>>,
    },
    /// Key/value pairs in insertion order; `None` is a nil map.
    Map(Option<Vec<(Value, Value)>>),
    /// A boxed dynamic value. `decl` of `None` is the empty/any interface;
    /// `Some(name)` is a named contract type, rendered opaquely.
    Iface {
        decl: Option<String>,
        inner: Option<Box<Value>>,
    },
    /// A channel reference with its textual form; `None` is nil.
    Chan(Option<String>),
    /// A function reference; `None` is nil.
    Func(Option<String>),
}

impl Value {
    pub fn record<N, K, I>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Struct {
            name: name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn ptr(inner: Option<Value>) -> Self {
        Value::Ptr(inner.map(Box::new))
    }

    pub fn slice(elem: impl Into<String>, items: Option<Vec<Value>>) -> Self {
        Value::Slice {
            elem: elem.into(),
            items,
        }
    }

    pub fn map(pairs: Option<Vec<(Value, Value)>>) -> Self {
        Value::Map(pairs)
    }

    /// A value boxed behind the empty/any interface.
    pub fn boxed(inner: Option<Value>) -> Self {
        Value::Iface {
            decl: None,
            inner: inner.map(Box::new),
        }
    }

    /// A value held behind a named contract type.
    pub fn contract(decl: impl Into<String>, inner: Option<Value>) -> Self {
        Value::Iface {
            decl: Some(decl.into()),
            inner: inner.map(Box::new),
        }
    }

    pub fn channel(repr: Option<&str>) -> Self {
        Value::Chan(repr.map(str::to_string))
    }

    pub fn func(repr: Option<&str>) -> Self {
        Value::Func(repr.map(str::to_string))
    }

    /// Kind name used as the default token tag for this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Struct { .. } => "struct",
            Value::Ptr(_) => "ptr",
            Value::Slice { .. } => "slice",
            Value::Map(_) => "map",
            Value::Iface { .. } => "interface",
            Value::Chan(_) => "chan",
            Value::Func(_) => "func",
        }
    }

    /// Convert to a `serde_json::Value` for JSON serialization.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::I8(i) => serde_json::Value::Number((*i).into()),
            Value::I16(i) => serde_json::Value::Number((*i).into()),
            Value::I32(i) => serde_json::Value::Number((*i).into()),
            Value::I64(i) => serde_json::Value::Number((*i).into()),
            Value::U8(u) => serde_json::Value::Number((*u).into()),
            Value::U16(u) => serde_json::Value::Number((*u).into()),
            Value::U32(u) => serde_json::Value::Number((*u).into()),
            Value::U64(u) => serde_json::Value::Number((*u).into()),
            Value::F32(f) => serde_json::Number::from_f64(f64::from(*f))
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Struct { fields, .. } => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            Value::Ptr(inner) => inner
                .as_deref()
                .map(Value::to_json_value)
                .unwrap_or(serde_json::Value::Null),
            Value::Slice { items, .. } => items
                .as_ref()
                .map(|items| {
                    serde_json::Value::Array(items.iter().map(Value::to_json_value).collect())
                })
                .unwrap_or(serde_json::Value::Null),
            Value::Map(pairs) => pairs
                .as_ref()
                .map(|pairs| {
                    serde_json::Value::Object(
                        pairs
                            .iter()
                            .map(|(k, v)| (k.to_string(), v.to_json_value()))
                            .collect(),
                    )
                })
                .unwrap_or(serde_json::Value::Null),
            Value::Iface { inner, .. } => inner
                .as_deref()
                .map(Value::to_json_value)
                .unwrap_or(serde_json::Value::Null),
            Value::Chan(repr) | Value::Func(repr) => repr
                .as_ref()
                .map(|r| serde_json::Value::String(r.clone()))
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(i) => write!(f, "{}", i),
            Value::I16(i) => write!(f, "{}", i),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::U8(u) => write!(f, "{}", u),
            Value::U16(u) => write!(f, "{}", u),
            Value::U32(u) => write!(f, "{}", u),
            Value::U64(u) => write!(f, "{}", u),
            Value::F32(fl) => write!(f, "{}", fl),
            Value::F64(fl) => write!(f, "{}", fl),
            Value::Struct { fields, .. } => {
                write!(f, "{{")?;
                for (i, (_, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            Value::Ptr(None) => write!(f, "<nil>"),
            Value::Ptr(Some(inner)) => write!(f, "&{}", inner),
            Value::Slice { items: None, .. } => write!(f, "[]"),
            Value::Slice {
                items: Some(items), ..
            } => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Map(None) => write!(f, "map[]"),
            Value::Map(Some(pairs)) => {
                write!(f, "map[")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                write!(f, "]")
            }
            Value::Iface { inner: None, .. } => write!(f, "<nil>"),
            Value::Iface {
                inner: Some(inner), ..
            } => write!(f, "{}", inner),
            Value::Chan(None) | Value::Func(None) => write!(f, "<nil>"),
            Value::Chan(Some(repr)) | Value::Func(Some(repr)) => write!(f, "{}", repr),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Value::I8(i)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::I16(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::I32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::I64(i)
    }
}

impl From<u8> for Value {
    fn from(u: u8) -> Self {
        Value::U8(u)
    }
}

impl From<u16> for Value {
    fn from(u: u16) -> Self {
        Value::U16(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::U32(u)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::U64(u)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::F32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::Nil.to_string(), "<nil>");
    }

    #[test]
    fn test_struct_display() {
        let v = Value::record("point", [("x", Value::from(1i64)), ("y", Value::from(2i64))]);
        assert_eq!(v.to_string(), "{1 2}");
        assert_eq!(Value::ptr(Some(v)).to_string(), "&{1 2}");
    }

    #[test]
    fn test_slice_and_map_display() {
        let s = Value::slice("i64", Some(vec![Value::from(1i64), Value::from(2i64)]));
        assert_eq!(s.to_string(), "[1 2]");

        let m = Value::map(Some(vec![(Value::from("a"), Value::from(1i64))]));
        assert_eq!(m.to_string(), "map[a:1]");
        assert_eq!(Value::map(None).to_string(), "map[]");
    }

    #[test]
    fn test_nil_references_display() {
        assert_eq!(Value::ptr(None).to_string(), "<nil>");
        assert_eq!(Value::channel(None).to_string(), "<nil>");
        assert_eq!(Value::func(None).to_string(), "<nil>");
        assert_eq!(Value::slice("u8", None).to_string(), "[]");
    }

    #[test]
    fn test_to_json_value() {
        let v = Value::record(
            "req",
            [
                ("id", Value::from(7i64)),
                ("tag", Value::from("alpha")),
            ],
        );
        let json = v.to_json_value();
        assert_eq!(json["id"], 7);
        assert_eq!(json["tag"], "alpha");

        assert_eq!(Value::ptr(None).to_json_value(), serde_json::Value::Null);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from(1u16).kind(), "u16");
        assert_eq!(Value::map(None).kind(), "map");
        assert_eq!(Value::boxed(None).kind(), "interface");
    }
}
