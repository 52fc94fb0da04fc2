//! Builder and sender for BearyChat incoming-webhook messages.
//!
//! ```no_run
//! # async fn run() -> bearychat::Result<()> {
//! let client = bearychat::Client::new("https://hook.bearychat.com/=.../incoming/...");
//!
//! let sent = client
//!     .to("@elf")
//!     .set_text("Hello, all")
//!     .add("This is an attachment")
//!     .send()
//!     .await?;
//! # let _ = sent;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod message;
pub mod payload;

pub use client::Client;
pub use config::ClientConfig;
pub use defaults::{DefaultKey, MessageDefaults};
pub use error::{Result, WebhookError};
pub use message::{Attachment, AttachmentFields, AttachmentInput, Image, Images, IntoContent, Message};
pub use payload::Payload;
