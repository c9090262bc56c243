//! Named call arguments.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wito_common::BridgeError;

/// The `args` object of an inbound call, keyed by parameter name.
///
/// Extraction failures are application errors, so the caller sees a reject
/// naming the offending parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Map<String, Value>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value. `null` is an empty argument set; anything
    /// other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(BridgeError::Decode(format!(
                "'args' must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Add an argument, replacing any previous value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// A required argument.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, BridgeError> {
        let raw = self
            .0
            .get(name)
            .ok_or_else(|| BridgeError::application(format!("Missing argument '{name}'")))?;
        serde_json::from_value(raw.clone()).map_err(|e| {
            BridgeError::application(format!("Invalid argument '{name}': {e}"))
        })
    }

    /// An optional argument; absent or `null` yields `default`.
    pub fn get_or<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, BridgeError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(default),
            Some(_) => self.get(name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_argument() {
        let args = Args::new().with("title", "Hi");
        let title: String = args.get("title").unwrap();
        assert_eq!(title, "Hi");
    }

    #[test]
    fn missing_argument_names_parameter() {
        let err = Args::new().get::<String>("path").unwrap_err();
        assert_eq!(err.to_string(), "Missing argument 'path'");
    }

    #[test]
    fn wrong_type_names_parameter() {
        let args = Args::new().with("width", "wide");
        let err = args.get::<u32>("width").unwrap_err();
        assert!(err.to_string().starts_with("Invalid argument 'width'"));
    }

    #[test]
    fn optional_argument_defaults() {
        let args = Args::new().with("priority", Value::Null);
        assert_eq!(
            args.get_or("priority", "normal".to_string()).unwrap(),
            "normal"
        );
        assert_eq!(args.get_or("other", 3u8).unwrap(), 3);

        let args = Args::new().with("priority", "high");
        assert_eq!(args.get_or("priority", "normal".to_string()).unwrap(), "high");
    }

    #[test]
    fn from_value_accepts_object_and_null() {
        let args = Args::from_value(json!({"a": 1, "b": [1, 2]})).unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.contains("b"));

        assert!(Args::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn from_value_rejects_positional_arrays() {
        let err = Args::from_value(json!(["Hi"])).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn into_value_round_trips_object() {
        let args = Args::new().with("x", 1);
        assert_eq!(args.into_value(), json!({"x": 1}));
    }
}
