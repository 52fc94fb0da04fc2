use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;

/// Anything the client can post to the webhook.
///
/// Resolved to a JSON body before any network call; a payload that
/// resolves to nothing is never sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already-encoded JSON text, sent as-is once it parses.
    Json(String),
    /// A structured value, encoded on send.
    Value(Value),
}

impl Payload {
    /// Captures any serializable value, e.g. a [`crate::Message`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Value(serde_json::to_value(value)?))
    }

    /// The request body, or `None` when there is nothing worth sending:
    /// blank or unparseable text, `null`, `false`, empty strings and empty
    /// arrays or objects.
    pub fn into_body(self) -> Option<String> {
        match self {
            Payload::Json(raw) => {
                if raw.trim().is_empty() {
                    return None;
                }
                match serde_json::from_str::<Value>(&raw) {
                    Ok(parsed) if !is_blank(&parsed) => Some(raw),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(error = %e, "payload is not valid JSON");
                        None
                    }
                }
            }
            Payload::Value(value) => (!is_blank(&value)).then(|| value.to_string()),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(true) | Value::Number(_) => false,
    }
}

impl From<String> for Payload {
    fn from(raw: String) -> Self {
        Self::Json(raw)
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Self {
        Self::Json(raw.to_string())
    }
}

impl From<&String> for Payload {
    fn from(raw: &String) -> Self {
        Self::Json(raw.clone())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self::Value(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use serde_json::json;

    #[test]
    fn test_empty_inputs_have_no_body() {
        assert_eq!(Payload::from("").into_body(), None);
        assert_eq!(Payload::from("   ").into_body(), None);
        assert_eq!(Payload::from("{}").into_body(), None);
        assert_eq!(Payload::from(json!({})).into_body(), None);
        assert_eq!(Payload::from(json!([])).into_body(), None);
        assert_eq!(Payload::from(Value::Null).into_body(), None);
    }

    #[test]
    fn test_unparseable_text_has_no_body() {
        assert_eq!(Payload::from("{not json").into_body(), None);
    }

    #[test]
    fn test_raw_json_is_sent_verbatim() {
        let raw = r#"{ "text": "hi" }"#;
        assert_eq!(Payload::from(raw).into_body(), Some(raw.to_string()));
    }

    #[test]
    fn test_value_is_encoded_compactly() {
        let body = Payload::from(json!({"text": "hi", "markdown": false})).into_body();
        assert_eq!(body, Some(r#"{"text":"hi","markdown":false}"#.to_string()));
    }

    #[test]
    fn test_message_payload() {
        let mut message = Message::new();
        message.set_text("hi").to("@elf");
        let body = Payload::from_serialize(&message).unwrap().into_body();
        assert_eq!(body, Some(r#"{"text":"hi","user":"elf"}"#.to_string()));

        let empty = Payload::from_serialize(&Message::new()).unwrap();
        assert_eq!(empty.into_body(), None);
    }
}
