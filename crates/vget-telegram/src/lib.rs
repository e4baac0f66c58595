//! Telegram adapter (teloxide).
//!
//! This crate implements the `vget-core` messenger port over the Telegram
//! Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use vget_core::{
    domain::{ChatId, DeliveryPayload},
    errors::Error,
    ports::Messenger,
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

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, payload: &DeliveryPayload) -> Result<()> {
        let document =
            InputFile::memory(payload.bytes.clone()).file_name(payload.filename.clone());

        self.with_retry(|| {
            self.bot
                .send_document(Self::tg_chat(chat_id), document.clone())
                .caption(payload.filename.clone())
        })
        .await?;
        Ok(())
    }
}
