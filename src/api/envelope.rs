//! Response envelope used by the profile endpoints.

use serde::Deserialize;
use serde_json::Value;

/// `{success, data, message | error}`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Envelope {
    /// Parse a response body; bodies that are not an envelope object yield `None`.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The server's human-readable explanation, if it sent one.
    pub fn server_message(&self) -> Option<String> {
        let from_error = match &self.error {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from),
            _ => None,
        };
        self.message
            .clone()
            .or(from_error)
            .filter(|m| !m.trim().is_empty())
    }

    /// The `data` payload, treating `null` as absent.
    pub fn into_data(self) -> Option<Value> {
        self.data.filter(|d| !d.is_null())
    }
}
