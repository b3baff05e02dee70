//! Message delivery capability
//!
//! The conversation core only ever needs "deliver this text to that user".
//! The trait keeps the core independent of the Telegram client, and lets
//! tests record deliveries instead of performing them.

use async_trait::async_trait;
use teloxide::requests::Requester;
use teloxide::types::ChatId;
use teloxide::Bot;

use crate::utils::errors::Result;

/// Abstract delivery capability: send a plain-text message to a user.
#[async_trait]
pub trait Courier: Send + Sync {
    async fn deliver(&self, recipient_id: i64, text: &str) -> Result<()>;
}

/// Courier backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramCourier {
    bot: Bot,
}

impl TelegramCourier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Courier for TelegramCourier {
    async fn deliver(&self, recipient_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(recipient_id), text).await?;
        Ok(())
    }
}
