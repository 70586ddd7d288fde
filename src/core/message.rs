//! Log message: a mutable field bag plus its originating template
//!
//! A `Message` owns a mapping from field name to [`Value`] and keeps the
//! format template and positional arguments it was built from, so renderers
//! can re-substitute colored argument text into the template later.

use crate::colorizer::Value;
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;

// Reserved field keys.
pub const KEY_TIME: &str = "time";
pub const KEY_SINCE: &str = "since";
pub const KEY_LEVEL: &str = "level";
pub const KEY_MESSAGE: &str = "message";
pub const KEY_FILE: &str = "file";
pub const KEY_LINE: &str = "line";
pub const KEY_FUNC: &str = "callerFuncName";
pub const KEY_CALLER_SHORT: &str = "caller_short";
pub const KEY_CALLER_LONG: &str = "caller_long";
pub const KEY_JSON: &str = "json";

/// Substitute `parts` into `format` at each `%v` placeholder, in order.
///
/// Placeholders without a matching part render empty; a part left over
/// after the last placeholder is appended after the final segment.
pub(crate) fn render_format(format: &str, parts: &[String]) -> String {
    let mut combined = String::new();
    for (i, piece) in format.split("%v").enumerate() {
        combined.push_str(piece);
        if let Some(part) = parts.get(i) {
            combined.push_str(part);
        }
    }
    combined
}

#[derive(Debug, Clone)]
pub struct Message {
    fields: HashMap<String, Value>,
    input_args: Vec<Value>,
    format: String,
}

impl Message {
    /// Build a message from a `%v` template and its positional arguments.
    ///
    /// The `message` field is rendered eagerly and `time` is stamped as
    /// RFC 3339 with nanoseconds; both are present from this point on.
    pub fn new(format: impl Into<String>, args: Vec<Value>) -> Self {
        let format = format.into();
        let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
        let mut fields = HashMap::new();
        fields.insert(
            KEY_MESSAGE.to_string(),
            Value::Str(render_format(&format, &rendered)),
        );
        fields.insert(
            KEY_TIME.to_string(),
            Value::Str(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)),
        );
        Self {
            fields,
            input_args: args,
            format,
        }
    }

    /// Field value, or `None` when absent.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set or overwrite a field.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Sorted list of the field names currently present.
    pub fn fields(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Positional arguments in call order.
    pub fn input_args(&self) -> &[Value] {
        &self.input_args
    }

    /// The original format template.
    pub fn format_str(&self) -> &str {
        &self.format
    }

    /// Set multiple fields at once.
    #[must_use]
    pub fn with_fields<K, I>(mut self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (key, value) in fields {
            self.fields.insert(key.into(), value);
        }
        self
    }

    /// Replace the `arg N` reflection fields with one entry per argument,
    /// rendered as `value kind`.
    #[must_use]
    pub fn with_args(mut self, args: &[Value]) -> Self {
        let field_count = self.fields.len();
        for i in 0..field_count {
            self.fields.remove(&format!("arg {}", i));
        }
        for (i, arg) in args.iter().enumerate() {
            self.fields.insert(
                format!("arg {}", i),
                Value::Str(format!("{} {}", arg, arg.kind())),
            );
        }
        self
    }

    /// JSON encoding of the full field map, wrapped in a `Fields` object.
    pub fn to_json(&self) -> crate::core::error::Result<String> {
        let mut fields = serde_json::Map::new();
        for key in self.fields() {
            if let Some(value) = self.value(&key) {
                fields.insert(key, value.to_json_value());
            }
        }
        let wrapped = serde_json::json!({ "Fields": fields });
        Ok(serde_json::to_string(&wrapped)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        let msg = Message::new("x=%v", vec![Value::from(5i64)]);
        assert_eq!(msg.value(KEY_MESSAGE), Some(&Value::from("x=5")));
    }

    #[test]
    fn test_mandatory_fields_present() {
        let msg = Message::new("hello", vec![]);
        assert!(msg.value(KEY_MESSAGE).is_some());
        assert!(msg.value(KEY_TIME).is_some());
    }

    #[test]
    fn test_time_is_rfc3339() {
        let msg = Message::new("t", vec![]);
        let time = msg.value(KEY_TIME).expect("time field").to_string();
        assert!(chrono::DateTime::parse_from_rfc3339(&time).is_ok());
    }

    #[test]
    fn test_set_field_overwrites() {
        let mut msg = Message::new("m", vec![]);
        msg.set_field("user", Value::from("alice"));
        msg.set_field("user", Value::from("bob"));
        assert_eq!(msg.value("user"), Some(&Value::from("bob")));
    }

    #[test]
    fn test_fields_sorted() {
        let mut msg = Message::new("m", vec![]);
        msg.set_field("zeta", Value::from(1i64));
        msg.set_field("alpha", Value::from(2i64));
        let keys = msg.fields();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"alpha".to_string()));
    }

    #[test]
    fn test_input_args_ordered() {
        let msg = Message::new(
            "%v %v",
            vec![Value::from("a"), Value::from(2i64)],
        );
        assert_eq!(msg.input_args().len(), 2);
        assert_eq!(msg.input_args()[0], Value::from("a"));
        assert_eq!(msg.format_str(), "%v %v");
    }

    #[test]
    fn test_render_format_shapes() {
        assert_eq!(render_format("x=%v", &["5".into()]), "x=5");
        assert_eq!(render_format("a%v b%v", &["1".into()]), "a1 b");
        assert_eq!(render_format("plain", &[]), "plain");
    }

    #[test]
    fn test_with_args_reflection_fields() {
        let msg = Message::new("m", vec![]).with_args(&[Value::from(7i64), Value::from("x")]);
        assert_eq!(msg.value("arg 0"), Some(&Value::from("7 i64")));
        assert_eq!(msg.value("arg 1"), Some(&Value::from("x string")));
    }

    #[test]
    fn test_to_json_wraps_fields() {
        let mut msg = Message::new("hi", vec![]);
        msg.set_field("user", Value::from("alice"));
        let json = msg.to_json().expect("encodes");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed["Fields"]["message"], "hi");
        assert_eq!(parsed["Fields"]["user"], "alice");
    }
}
