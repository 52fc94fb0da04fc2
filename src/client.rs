use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::defaults::MessageDefaults;
use crate::error::Result;
use crate::message::{Attachment, AttachmentInput, Images, IntoContent, Message};
use crate::payload::Payload;

/// Handle on one incoming webhook.
///
/// Cloning is cheap and every clone shares the same URL, defaults and HTTP
/// handle, so messages created from a client observe later changes to it.
#[derive(Clone, Default)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Default)]
struct ClientInner {
    webhook: RwLock<String>,
    defaults: RwLock<MessageDefaults>,
    // Built on first send and reused afterwards.
    http: OnceCell<reqwest::Client>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Client {
    pub fn new(webhook: impl Into<String>) -> Self {
        Self::with_defaults(webhook, MessageDefaults::default())
    }

    pub fn with_defaults(webhook: impl Into<String>, defaults: impl Into<MessageDefaults>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                webhook: RwLock::new(webhook.into()),
                defaults: RwLock::new(defaults.into()),
                http: OnceCell::new(),
            }),
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_defaults(config.webhook, config.message_defaults)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(ClientConfig::from_env()?))
    }

    pub fn webhook(&self) -> String {
        read(&self.inner.webhook).clone()
    }

    /// Not validated; a bad URL only shows up as a transport error on send.
    pub fn set_webhook(&self, webhook: impl Into<String>) -> &Self {
        *write(&self.inner.webhook) = webhook.into();
        self
    }

    pub fn message_defaults(&self) -> MessageDefaults {
        read(&self.inner.defaults).clone()
    }

    pub fn message_default(&self, key: impl AsRef<str>) -> Option<Value> {
        read(&self.inner.defaults).get(key).cloned()
    }

    pub fn set_message_defaults(&self, defaults: impl Into<MessageDefaults>) -> &Self {
        *write(&self.inner.defaults) = defaults.into();
        self
    }

    /// Whether both handles refer to the same client.
    pub fn ptr_eq(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn create_message(&self) -> Message {
        Message::with_client(self)
    }

    pub fn text(&self, text: impl IntoContent) -> Message {
        let mut message = self.create_message();
        message.set_text(text);
        message
    }

    pub fn notification(&self, notification: impl IntoContent) -> Message {
        let mut message = self.create_message();
        message.set_notification(notification);
        message
    }

    pub fn markdown(&self, markdown: bool) -> Message {
        let mut message = self.create_message();
        message.set_markdown(markdown);
        message
    }

    pub fn channel(&self, channel: impl IntoContent) -> Message {
        let mut message = self.create_message();
        message.set_channel(channel);
        message
    }

    pub fn user(&self, user: impl IntoContent) -> Message {
        let mut message = self.create_message();
        message.set_user(user);
        message
    }

    pub fn to(&self, target: impl AsRef<str>) -> Message {
        let mut message = self.create_message();
        message.to(target);
        message
    }

    pub fn add(&self, attachment: impl Into<AttachmentInput>) -> Message {
        let mut message = self.create_message();
        message.add(attachment);
        message
    }

    pub fn add_attachment(
        &self,
        text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> Message {
        let mut message = self.create_message();
        message.add_attachment(text, title, images, color);
        message
    }

    pub fn add_attachment_fields(&self, attachment: impl Into<Attachment>) -> Message {
        let mut message = self.create_message();
        message.add_attachment_fields(attachment);
        message
    }

    pub fn add_image(&self, image: impl Into<Images>, caption: impl IntoContent) -> Message {
        let mut message = self.create_message();
        message.add_image(image, caption);
        message
    }

    /// Sends `text` to the default target.
    pub async fn send(&self, text: impl IntoContent) -> Result<bool> {
        let mut message = self.create_message();
        message.set_text(text);
        self.send_message(&message).await
    }

    pub async fn send_to(&self, target: impl AsRef<str>, text: impl IntoContent) -> Result<bool> {
        let mut message = self.create_message();
        message.to(target).set_text(text);
        self.send_message(&message).await
    }

    pub async fn send_content(
        &self,
        text: impl IntoContent,
        markdown: bool,
        notification: impl IntoContent,
    ) -> Result<bool> {
        self.create_message()
            .send_content(text, markdown, notification)
            .await
    }

    pub async fn send_to_content(
        &self,
        target: impl AsRef<str>,
        text: impl IntoContent,
        markdown: bool,
        notification: impl IntoContent,
    ) -> Result<bool> {
        self.create_message()
            .send_to_content(target, text, markdown, notification)
            .await
    }

    /// Sends `text` with one attachment built from the positional fields.
    pub async fn send_with_attachment(
        &self,
        text: impl IntoContent,
        attachment_text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> Result<bool> {
        self.create_message()
            .send_with_attachment(text, attachment_text, title, images, color)
            .await
    }

    pub async fn send_to_with_attachment(
        &self,
        target: impl AsRef<str>,
        text: impl IntoContent,
        attachment_text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> Result<bool> {
        self.create_message()
            .send_to_with_attachment(target, text, attachment_text, title, images, color)
            .await
    }

    pub async fn send_message(&self, message: &Message) -> Result<bool> {
        self.send_payload(Payload::from_serialize(message)?).await
    }

    /// Posts the payload to the webhook.
    ///
    /// `Ok(true)` only for a 200 answer. A payload with no body is refused
    /// with `Ok(false)` before any request; transport errors are returned
    /// as they come.
    pub async fn send_payload(&self, payload: impl Into<Payload>) -> Result<bool> {
        let Some(body) = payload.into().into_body() else {
            warn!("empty payload, nothing sent");
            return Ok(false);
        };

        let webhook = self.webhook();
        let bytes = body.len();
        let response = self
            .http()?
            .post(webhook.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, bytes, "posted payload to webhook");
        Ok(status == StatusCode::OK)
    }

    fn http(&self) -> Result<&reqwest::Client> {
        let http = self
            .inner
            .http
            .get_or_try_init(|| reqwest::Client::builder().build())?;
        Ok(http)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("webhook", &*read(&self.inner.webhook))
            .field("defaults", &*read(&self.inner.defaults))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_webhook() {
        let client = Client::new("foo");
        assert_eq!(client.webhook(), "foo");
        client.set_webhook("bar");
        assert_eq!(client.webhook(), "bar");
    }

    #[test]
    fn test_set_message_defaults() {
        let client = Client::with_defaults("", json!({"foo": "bar"}));
        assert_eq!(client.message_defaults(), MessageDefaults::from(json!({"foo": "bar"})));

        client.set_message_defaults(json!({"test": "demo"}));
        assert_eq!(client.message_defaults(), MessageDefaults::from(json!({"test": "demo"})));
    }

    #[test]
    fn test_message_default_by_key() {
        let client = Client::default();
        client.set_message_defaults(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(client.message_default("a"), Some(json!(1)));
        assert_eq!(client.message_default("not found"), None);
    }

    #[test]
    fn test_create_message_is_bound() {
        let client = Client::new("http://hook");
        let message = client.create_message();
        assert!(message.client().unwrap().ptr_eq(&client));
        assert!(!Client::new("http://hook").ptr_eq(&client));
    }

    #[test]
    fn test_facade_applies_defaults_then_call() {
        let client = Client::with_defaults(
            "http://hook",
            json!({"channel": "general", "attachment_color": "#f00"}),
        );

        let message = client.to("@elf");
        assert_eq!(message.user(), Some("elf"));
        assert_eq!(message.channel(), None);

        let message = client.add("note");
        assert_eq!(message.channel(), Some("general"));
        assert_eq!(
            message.to_value().unwrap(),
            json!({"channel": "general", "attachments": [{"text": "note", "color": "#f00"}]})
        );
    }

    #[test]
    fn test_clones_share_state() {
        let client = Client::new("a");
        let message = client.text("hi");
        client.set_webhook("b");
        assert_eq!(message.client().unwrap().webhook(), "b");
    }
}
