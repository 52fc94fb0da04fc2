use serde_json::Value;

/// Conversion of caller input into an optional piece of message text.
///
/// "No content" always comes back as `None`: empty strings, `"0"`, numeric
/// zero, JSON `null`, `false` and empty arrays or objects. Structured JSON values fall back to
/// their compact JSON encoding, which leaves unicode and slashes unescaped.
pub trait IntoContent {
    fn into_content(self) -> Option<String>;
}

fn is_blank(text: &str) -> bool {
    matches!(text, "" | "0")
}

impl IntoContent for &str {
    fn into_content(self) -> Option<String> {
        (!is_blank(self)).then(|| self.to_string())
    }
}

impl IntoContent for String {
    fn into_content(self) -> Option<String> {
        (!is_blank(&self)).then_some(self)
    }
}

impl IntoContent for &String {
    fn into_content(self) -> Option<String> {
        self.as_str().into_content()
    }
}

impl IntoContent for Option<&str> {
    fn into_content(self) -> Option<String> {
        self.and_then(IntoContent::into_content)
    }
}

impl IntoContent for char {
    fn into_content(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoContent for &Value {
    fn into_content(self) -> Option<String> {
        match self {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => s.as_str().into_content(),
            Value::Array(items) if items.is_empty() => None,
            Value::Object(map) if map.is_empty() => None,
            structured => serde_json::to_string(structured).ok(),
        }
    }
}

impl IntoContent for Value {
    fn into_content(self) -> Option<String> {
        match self {
            Value::String(s) => s.into_content(),
            other => (&other).into_content(),
        }
    }
}

macro_rules! numeric_content {
    ($zero:literal => $($ty:ty),* $(,)?) => {
        $(
            impl IntoContent for $ty {
                fn into_content(self) -> Option<String> {
                    (self != $zero).then(|| self.to_string())
                }
            }
        )*
    };
}

numeric_content!(0 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
numeric_content!(0.0 => f32, f64);

/// Loose truthiness used when a configured default must become a flag.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !is_blank(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_strings_are_no_content() {
        assert_eq!("".into_content(), None);
        assert_eq!(String::new().into_content(), None);
        assert_eq!(None::<&str>.into_content(), None);
        assert_eq!("0".into_content(), None);
        assert_eq!(String::from("0").into_content(), None);
        assert_eq!("foo".into_content(), Some("foo".to_string()));
        assert_eq!("00".into_content(), Some("00".to_string()));
    }

    #[test]
    fn test_numbers_stringify() {
        assert_eq!(123i32.into_content(), Some("123".to_string()));
        assert_eq!(json!(1.5).into_content(), Some("1.5".to_string()));
        assert_eq!((-7i64).into_content(), Some("-7".to_string()));
    }

    #[test]
    fn test_zero_is_no_content() {
        assert_eq!(0u8.into_content(), None);
        assert_eq!(0i32.into_content(), None);
        assert_eq!(0.0f64.into_content(), None);
        assert_eq!(json!(0).into_content(), None);
        assert_eq!(json!(0.0).into_content(), None);
        assert_eq!(json!("0").into_content(), None);
    }

    #[test]
    fn test_structured_values_use_unescaped_json() {
        let value = json!({"url": "http://example.com/a/b", "name": "中文"});
        assert_eq!(
            value.into_content(),
            Some(r#"{"url":"http://example.com/a/b","name":"中文"}"#.to_string())
        );
        assert_eq!(json!([]).into_content(), None);
        assert_eq!(json!(null).into_content(), None);
        assert_eq!(json!(false).into_content(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!("false")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }
}
