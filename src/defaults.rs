use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Configuration keys honored when seeding a new message.
///
/// The declaration order is the order defaults are applied in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DefaultKey {
    /// Channel the message goes to unless one is set explicitly.
    Channel,
    /// User the message goes to when no channel default exists.
    User,
    Markdown,
    Notification,
    /// Color of the separator drawn left of every attachment.
    AttachmentColor,
}

impl DefaultKey {
    pub fn all() -> Vec<DefaultKey> {
        Self::iter().collect()
    }

    pub fn all_keys() -> Vec<&'static str> {
        Self::iter().map(<&'static str>::from).collect()
    }
}

/// Default values a client hands to every message it creates.
///
/// Unknown keys are kept so the map round-trips, but only the
/// [`DefaultKey`] entries are ever applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDefaults(Map<String, Value>);

impl MessageDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.as_ref().to_string(), value.into());
        self
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.0.get(key.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Recognized keys holding a non-null value, in application order.
    pub fn recognized(&self) -> impl Iterator<Item = (DefaultKey, &Value)> + '_ {
        DefaultKey::iter().filter_map(|key| match self.0.get(key.as_ref()) {
            None | Some(Value::Null) => None,
            Some(value) => Some((key, value)),
        })
    }
}

impl From<Map<String, Value>> for MessageDefaults {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for MessageDefaults {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MessageDefaults
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_keys_in_application_order() {
        assert_eq!(
            DefaultKey::all_keys(),
            vec!["channel", "user", "markdown", "notification", "attachment_color"]
        );
        assert_eq!(DefaultKey::all().len(), 5);
    }

    #[test]
    fn test_key_parses_from_wire_name() {
        assert_eq!(
            "attachment_color".parse::<DefaultKey>().unwrap(),
            DefaultKey::AttachmentColor
        );
        assert!("color".parse::<DefaultKey>().is_err());
        assert_eq!(DefaultKey::Notification.to_string(), "notification");
    }

    #[test]
    fn test_get_unknown_key_is_none() {
        let defaults = MessageDefaults::new().with("a", 1).with("b", 2);
        assert_eq!(defaults.get("a"), Some(&json!(1)));
        assert_eq!(defaults.get("not found"), None);
    }

    #[test]
    fn test_recognized_skips_nulls_and_unknown_keys() {
        let defaults: MessageDefaults = json!({
            "user": "elf",
            "channel": null,
            "foo": "bar",
            "attachment_color": "#f00",
        })
        .into();

        let keys: Vec<DefaultKey> = defaults.recognized().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![DefaultKey::User, DefaultKey::AttachmentColor]);
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let defaults: MessageDefaults =
            serde_json::from_str(r#"{"channel":"general","markdown":false}"#).unwrap();
        assert_eq!(defaults.get(DefaultKey::Channel), Some(&json!("general")));
        assert_eq!(defaults.get("markdown"), Some(&json!(false)));
    }
}
