mod attachment;
mod content;


pub use attachment::{Attachment, AttachmentFields, AttachmentInput, Image, Images};
pub use content::{IntoContent, is_truthy};

use serde::{Serialize, Serializer};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::HashSet;
use tracing::debug;

use crate::client::Client;
use crate::defaults::{DefaultKey, MessageDefaults};
use crate::error::Result;
use crate::payload::Payload;

/// Wire form of a message. Field order here is the order on the wire.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct WirePayload<'a> {
    text: Option<&'a str>,
    notification: Option<&'a str>,
    markdown: Option<bool>,
    channel: Option<&'a str>,
    user: Option<&'a str>,
    #[serde(skip_serializing_if = "no_attachments")]
    attachments: &'a [Attachment],
}

fn no_attachments(attachments: &&[Attachment]) -> bool {
    attachments.is_empty()
}

/// Outgoing chat message, built through chained `&mut self` calls.
///
/// A message is either standalone or bound to a [`Client`]; binding seeds
/// the client's defaults and is what makes [`Message::send`] reach the
/// network.
#[derive(Debug, Clone, Default)]
pub struct Message {
    client: Option<Client>,
    text: Option<String>,
    notification: Option<String>,
    /// Unset and explicit `true` serialize the same way, but only unset
    /// accepts a configured default.
    markdown: Option<bool>,
    channel: Option<String>,
    user: Option<String>,
    attachments: Vec<Attachment>,
    attachment_defaults: Attachment,
}

impl Message {
    /// A standalone message with no target defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: &Client) -> Self {
        let mut message = Self::new();
        message.client = Some(client.clone());
        message.configure_defaults(&client.message_defaults(), false);
        message
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Binds the message to another client and seeds its defaults even when
    /// the message already holds content. Fields the message already sets
    /// are kept.
    pub fn set_client(&mut self, client: &Client) -> &mut Self {
        self.client = Some(client.clone());
        self.configure_defaults(&client.message_defaults(), true)
    }

    /// Applies the recognized defaults.
    ///
    /// A message that already has content is left alone unless `force` is
    /// set. Either way a default only fills a field that is still unset, and
    /// target defaults are skipped once any target exists. The attachment
    /// color lands in the attachment defaults.
    pub fn configure_defaults(&mut self, defaults: &MessageDefaults, force: bool) -> &mut Self {
        if !force && !self.is_blank() {
            debug!("message already has content, defaults skipped");
            return self;
        }

        let mut has_target = self.channel.is_some() || self.user.is_some();

        for (key, value) in defaults.recognized() {
            match key {
                DefaultKey::Channel | DefaultKey::User => {
                    if has_target {
                        continue;
                    }
                    let Some(name) = value.into_content() else {
                        continue;
                    };
                    if key == DefaultKey::Channel {
                        self.set_channel(name);
                    } else {
                        self.set_user(name);
                    }
                    has_target = true;
                }
                DefaultKey::Markdown => {
                    if self.markdown.is_some() {
                        continue;
                    }
                    self.markdown = Some(is_truthy(value));
                }
                DefaultKey::Notification => {
                    if self.notification.is_some() {
                        continue;
                    }
                    self.set_notification(value);
                }
                DefaultKey::AttachmentColor => {
                    self.attachment_defaults
                        .insert(AttachmentFields::COLOR, value.clone());
                }
            }
            debug!(key = %key, force, "applied message default");
        }

        self
    }

    /// Whether nothing would reach the wire.
    pub fn is_blank(&self) -> bool {
        let wire = self.wire();
        wire.text.is_none()
            && wire.notification.is_none()
            && wire.markdown.is_none()
            && wire.channel.is_none()
            && wire.user.is_none()
            && wire.attachments.is_empty()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl IntoContent) -> &mut Self {
        self.text = text.into_content();
        self
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn set_notification(&mut self, notification: impl IntoContent) -> &mut Self {
        self.notification = notification.into_content();
        self
    }

    /// The explicit markdown setting, `None` when never set.
    pub fn markdown(&self) -> Option<bool> {
        self.markdown
    }

    /// Whether the receiver will parse `text` as markdown.
    pub fn is_markdown(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn set_markdown(&mut self, markdown: bool) -> &mut Self {
        self.markdown = Some(markdown);
        self
    }

    pub fn enable_markdown(&mut self) -> &mut Self {
        self.set_markdown(true)
    }

    pub fn disable_markdown(&mut self) -> &mut Self {
        self.set_markdown(false)
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Targets a channel, dropping any user target.
    pub fn set_channel(&mut self, channel: impl IntoContent) -> &mut Self {
        self.user = None;
        self.channel = channel.into_content();
        self
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_channel(&mut self, channel: impl IntoContent) -> &mut Self {
        self.set_channel(channel)
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Targets a user, dropping any channel target.
    pub fn set_user(&mut self, user: impl IntoContent) -> &mut Self {
        self.channel = None;
        self.user = user.into_content();
        self
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_user(&mut self, user: impl IntoContent) -> &mut Self {
        self.set_user(user)
    }

    /// Sets the target from `@user`, `#channel` or a bare channel name.
    ///
    /// Empty and marker-only input (`"@"`, `"#"`) removes every target.
    pub fn to(&mut self, target: impl AsRef<str>) -> &mut Self {
        let target = target.as_ref();
        match target.chars().next() {
            Some(mark @ ('@' | '#')) => {
                let name = &target[mark.len_utf8()..];
                if name.is_empty() {
                    self.clear_target()
                } else if mark == '@' {
                    self.set_user(name)
                } else {
                    self.set_channel(name)
                }
            }
            Some(_) => self.set_channel(target),
            None => self.clear_target(),
        }
    }

    pub fn set_target(&mut self, target: impl AsRef<str>) -> &mut Self {
        self.to(target)
    }

    /// The current target rendered as `#channel` or `@user`.
    pub fn target(&self) -> Option<String> {
        match (&self.channel, &self.user) {
            (Some(channel), _) => Some(format!("#{}", channel)),
            (None, Some(user)) => Some(format!("@{}", user)),
            (None, None) => None,
        }
    }

    /// Falls back to the webhook's own target.
    pub fn clear_target(&mut self) -> &mut Self {
        self.channel = None;
        self.user = None;
        self
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Replaces every attachment. Each item goes through the add path, so
    /// the current attachment defaults are merged in again.
    pub fn set_attachments<I>(&mut self, attachments: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<AttachmentInput>,
    {
        self.attachments.clear();
        for attachment in attachments {
            self.add(attachment);
        }
        self
    }

    pub fn attachment_defaults(&self) -> &Attachment {
        &self.attachment_defaults
    }

    /// Replaces the defaults merged into attachments added from now on.
    pub fn set_attachment_defaults(&mut self, defaults: impl Into<Attachment>) -> &mut Self {
        self.attachment_defaults = defaults.into();
        self
    }

    /// Adds an attachment from its positional fields. Absent or empty
    /// fields are left out of the attachment.
    pub fn add_attachment(
        &mut self,
        text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> &mut Self {
        let fields = AttachmentFields {
            text: text.into_content(),
            title: title.into_content(),
            images: images.into(),
            color: color.into_content(),
        };
        self.push_attachment(fields.into())
    }

    /// Adds a complete attachment mapping. Unrecognized keys are kept.
    pub fn add_attachment_fields(&mut self, attachment: impl Into<Attachment>) -> &mut Self {
        self.push_attachment(attachment.into())
    }

    /// Adds either a full attachment or a text-only one.
    pub fn add(&mut self, attachment: impl Into<AttachmentInput>) -> &mut Self {
        match attachment.into() {
            AttachmentInput::Fields(attachment) => self.push_attachment(attachment),
            AttachmentInput::Text(text) => self.push_attachment(
                AttachmentFields {
                    text,
                    ..AttachmentFields::default()
                }
                .into(),
            ),
        }
    }

    /// Adds an attachment holding one image and an optional caption as text.
    pub fn add_image(&mut self, image: impl Into<Images>, caption: impl IntoContent) -> &mut Self {
        self.add_attachment(caption, None, image, None)
    }

    fn push_attachment(&mut self, mut attachment: Attachment) -> &mut Self {
        attachment.normalize_images();
        if attachment.is_empty() {
            return self;
        }
        attachment.merge_defaults(&self.attachment_defaults);
        self.attachments.push(attachment);
        self
    }

    /// Removes the attachments at the given indices and closes the gaps.
    /// Indices past the end are ignored.
    pub fn remove_attachments(&mut self, indices: impl IntoIterator<Item = usize>) -> &mut Self {
        let doomed: HashSet<usize> = indices.into_iter().collect();
        let mut index = 0;
        self.attachments.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        self
    }

    pub fn remove(&mut self, indices: impl IntoIterator<Item = usize>) -> &mut Self {
        self.remove_attachments(indices)
    }

    pub fn clear_attachments(&mut self) -> &mut Self {
        self.attachments.clear();
        self
    }

    /// Text, markdown flag and notification in one call. A missing
    /// notification clears the previous one.
    pub fn set_content(
        &mut self,
        text: impl IntoContent,
        markdown: bool,
        notification: impl IntoContent,
    ) -> &mut Self {
        self.set_text(text)
            .set_markdown(markdown)
            .set_notification(notification)
    }

    /// Text followed by the positional fields of a new attachment.
    pub fn set_content_with_attachment(
        &mut self,
        text: impl IntoContent,
        attachment_text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> &mut Self {
        self.set_text(text)
            .add_attachment(attachment_text, title, images, color)
    }

    fn wire(&self) -> WirePayload<'_> {
        WirePayload {
            text: self.text.as_deref(),
            notification: self.notification.as_deref(),
            markdown: self.markdown.filter(|markdown| !markdown),
            channel: self.channel.as_deref(),
            user: self.user.as_deref(),
            attachments: &self.attachments,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sends through the bound client. Unbound messages return `false`
    /// without touching the network.
    pub async fn send(&self) -> Result<bool> {
        let Some(client) = &self.client else {
            debug!("message has no client, nothing sent");
            return Ok(false);
        };
        client.send_message(self).await
    }

    pub async fn send_to(&mut self, target: impl AsRef<str>) -> Result<bool> {
        self.to(target);
        self.send().await
    }

    /// Sends `payload` in place of this message's own content.
    pub async fn send_payload(&self, payload: impl Into<Payload>) -> Result<bool> {
        let Some(client) = &self.client else {
            debug!("message has no client, nothing sent");
            return Ok(false);
        };
        client.send_payload(payload).await
    }

    pub async fn send_content(
        &mut self,
        text: impl IntoContent,
        markdown: bool,
        notification: impl IntoContent,
    ) -> Result<bool> {
        self.set_content(text, markdown, notification);
        self.send().await
    }

    pub async fn send_to_content(
        &mut self,
        target: impl AsRef<str>,
        text: impl IntoContent,
        markdown: bool,
        notification: impl IntoContent,
    ) -> Result<bool> {
        self.to(target);
        self.send_content(text, markdown, notification).await
    }

    /// Sets the text, adds one attachment from the positional fields and
    /// sends.
    pub async fn send_with_attachment(
        &mut self,
        text: impl IntoContent,
        attachment_text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> Result<bool> {
        self.set_content_with_attachment(text, attachment_text, title, images, color);
        self.send().await
    }

    pub async fn send_to_with_attachment(
        &mut self,
        target: impl AsRef<str>,
        text: impl IntoContent,
        attachment_text: impl IntoContent,
        title: impl IntoContent,
        images: impl Into<Images>,
        color: impl IntoContent,
    ) -> Result<bool> {
        self.to(target);
        self.send_with_attachment(text, attachment_text, title, images, color)
            .await
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.wire().serialize(serializer)
    }
}
