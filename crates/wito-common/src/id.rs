use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Correlation token supplied by the script side with every call.
///
/// The host never generates or validates these; it only echoes the token
/// back in exactly one resolve or reject envelope. Numeric ids (the script
/// runtime uses a counter) are normalized to their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a quoted, escaped script string literal.
    pub fn to_script_literal(&self) -> String {
        serde_json::Value::String(self.0.clone()).to_string()
    }
}

impl<'de> Deserialize<'de> for CallId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CallId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
