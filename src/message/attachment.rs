use bearychat_macros::define_field_names;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::IntoContent;

/// A single image entry on the wire: `{"url": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Accepts a bare URL string or a mapping holding a `url` key.
    /// Anything that does not yield a non-empty string is dropped.
    fn from_value(value: &Value) -> Option<Self> {
        let url = match value {
            Value::String(url) => url,
            Value::Object(map) => match map.get("url") {
                Some(Value::String(url)) => url,
                _ => return None,
            },
            _ => return None,
        };
        (!url.is_empty()).then(|| Self::new(url.as_str()))
    }
}

/// Ordered list of normalized images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Images(Vec<Image>);

impl Images {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Image> {
        self.0
    }

    /// Normalizes a scalar, a `{url}` mapping or a sequence of either.
    pub fn normalize(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self(items.iter().filter_map(Image::from_value).collect()),
            single => Self(Image::from_value(single).into_iter().collect()),
        }
    }

    fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|image| {
                    let mut entry = Map::new();
                    entry.insert("url".to_string(), Value::String(image.url.clone()));
                    Value::Object(entry)
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Images {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&str> for Images {
    fn from(url: &str) -> Self {
        Self::normalize(&Value::from(url))
    }
}

impl From<String> for Images {
    fn from(url: String) -> Self {
        Self::normalize(&Value::String(url))
    }
}

impl From<Option<&str>> for Images {
    fn from(url: Option<&str>) -> Self {
        url.map(Images::from).unwrap_or_default()
    }
}

impl From<Vec<&str>> for Images {
    fn from(urls: Vec<&str>) -> Self {
        urls.as_slice().into()
    }
}

impl From<&[&str]> for Images {
    fn from(urls: &[&str]) -> Self {
        Self(
            urls.iter()
                .filter(|url| !url.is_empty())
                .map(|url| Image::new(*url))
                .collect(),
        )
    }
}

impl<const N: usize> From<[&str; N]> for Images {
    fn from(urls: [&str; N]) -> Self {
        urls.as_slice().into()
    }
}

impl From<Vec<String>> for Images {
    fn from(urls: Vec<String>) -> Self {
        Self(
            urls.into_iter()
                .filter(|url| !url.is_empty())
                .map(Image::new)
                .collect(),
        )
    }
}

impl From<Value> for Images {
    fn from(value: Value) -> Self {
        Self::normalize(&value)
    }
}

impl From<Vec<Value>> for Images {
    fn from(values: Vec<Value>) -> Self {
        Self(values.iter().filter_map(Image::from_value).collect())
    }
}

impl From<Image> for Images {
    fn from(image: Image) -> Self {
        Self::from(vec![image])
    }
}

impl From<Vec<Image>> for Images {
    fn from(images: Vec<Image>) -> Self {
        Self(images.into_iter().filter(|i| !i.url.is_empty()).collect())
    }
}

/// The recognized attachment fields, in positional order.
#[define_field_names]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentFields {
    pub text: Option<String>,
    pub title: Option<String>,
    pub images: Images,
    pub color: Option<String>,
}

impl AttachmentFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl IntoContent) -> Self {
        self.text = text.into_content();
        self
    }

    pub fn title(mut self, title: impl IntoContent) -> Self {
        self.title = title.into_content();
        self
    }

    pub fn images(mut self, images: impl Into<Images>) -> Self {
        self.images = images.into();
        self
    }

    pub fn color(mut self, color: impl IntoContent) -> Self {
        self.color = color.into_content();
        self
    }
}

/// A secondary content block of a message.
///
/// This is an open mapping: the recognized keys are `text`, `title`,
/// `color` and `images`, and anything else is passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(Map<String, Value>);

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.get(AttachmentFields::TEXT).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(AttachmentFields::TITLE).and_then(Value::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.get(AttachmentFields::COLOR).and_then(Value::as_str)
    }

    pub fn images(&self) -> Images {
        self.get(AttachmentFields::IMAGES)
            .map(Images::normalize)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// True when every key is one of the recognized attachment fields.
    pub fn has_only_recognized_keys(map: &Map<String, Value>) -> bool {
        map.keys().all(|key| AttachmentFields::is_field_name(key))
    }

    /// Rewrites an `images` entry into the `[{url}]` shape, removing it
    /// when nothing usable is left.
    pub(crate) fn normalize_images(&mut self) {
        let Some(raw) = self.0.get(AttachmentFields::IMAGES) else {
            return;
        };
        let images = Images::normalize(raw);
        if images.is_empty() {
            self.0.remove(AttachmentFields::IMAGES);
        } else {
            self.0
                .insert(AttachmentFields::IMAGES.to_string(), images.to_value());
        }
    }

    /// Fills in every default the attachment does not already carry.
    pub(crate) fn merge_defaults(&mut self, defaults: &Attachment) {
        for (key, value) in &defaults.0 {
            if !self.0.contains_key(key) {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }
}

impl From<Map<String, Value>> for Attachment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Non-object values carry no fields and become an empty attachment.
impl From<Value> for Attachment {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<AttachmentFields> for Attachment {
    fn from(fields: AttachmentFields) -> Self {
        let mut map = Map::new();
        if let Some(text) = fields.text {
            map.insert(AttachmentFields::TEXT.to_string(), Value::String(text));
        }
        if let Some(title) = fields.title {
            map.insert(AttachmentFields::TITLE.to_string(), Value::String(title));
        }
        if !fields.images.is_empty() {
            map.insert(
                AttachmentFields::IMAGES.to_string(),
                fields.images.to_value(),
            );
        }
        if let Some(color) = fields.color {
            map.insert(AttachmentFields::COLOR.to_string(), Value::String(color));
        }
        Self(map)
    }
}

/// What a single-value `add` call resolves to.
///
/// Typed inputs pick their variant at compile time. A raw JSON value is
/// inspected: an object made only of recognized keys is a full attachment,
/// anything else becomes the attachment text.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentInput {
    Fields(Attachment),
    Text(Option<String>),
}

impl From<Attachment> for AttachmentInput {
    fn from(attachment: Attachment) -> Self {
        Self::Fields(attachment)
    }
}

impl From<AttachmentFields> for AttachmentInput {
    fn from(fields: AttachmentFields) -> Self {
        Self::Fields(fields.into())
    }
}

impl From<Map<String, Value>> for AttachmentInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Fields(map.into())
    }
}

impl From<Value> for AttachmentInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if Attachment::has_only_recognized_keys(&map) => {
                Self::Fields(map.into())
            }
            other => Self::Text(other.into_content()),
        }
    }
}

macro_rules! text_input {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttachmentInput {
                fn from(text: $ty) -> Self {
                    Self::Text(text.into_content())
                }
            }
        )*
    };
}

text_input!(
    &str,
    String,
    &String,
    Option<&str>,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
);
