//! Telegram adapter (teloxide).
//!
//! This crate implements the `hwb-core` MessagingPort over Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::Recipient};

use hwb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    /// Numeric ids address a chat directly; anything else is a channel username.
    fn recipient(chat_id: &ChatId) -> Recipient {
        let raw = chat_id.0.trim();
        match raw.parse::<i64>() {
            Ok(id) => Recipient::Id(teloxide::types::ChatId(id)),
            Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
            Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
        }
    }

    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<MessageRef> {
        // Plain text on purpose: failure reports carry raw API bodies.
        let msg = self
            .bot
            .send_message(Self::recipient(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;

        tracing::debug!(chat_id = %chat_id.0, message_id = msg.id.0, "telegram message sent");

        Ok(MessageRef {
            chat_id: chat_id.clone(),
            message_id: MessageId(msg.id.0),
        })
    }
}
