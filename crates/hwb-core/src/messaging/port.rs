use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::MessagingCapabilities,
    Result,
};

/// Notifier port.
///
/// Implementations send plain text and report failures as `Error::Delivery`.
/// They must not retry: the next poll cycle is the retry.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<MessageRef>;
}
