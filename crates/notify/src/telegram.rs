use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{ChatId, ParseMode};
use teloxide::Bot;
use tracing::info;

use common::{Error, Notifier, Result, TradeEvent};

use crate::format;

/// Delivers transition messages to a single Telegram chat.
///
/// Fire-and-forget from the caller's point of view: the ledger logs a
/// failed send and moves on; nothing retries and nothing blocks on it.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token.into()),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, event: &TradeEvent) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format::render(event))
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| Error::Notification(e.to_string()))?;
        Ok(())
    }
}

/// Degradation mode when Telegram credentials are absent: transitions are
/// logged instead of delivered, and the core logic runs unchanged.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, event: &TradeEvent) -> Result<()> {
        info!(message = %format::render(event), "Notification (logging-only mode)");
        Ok(())
    }
}
