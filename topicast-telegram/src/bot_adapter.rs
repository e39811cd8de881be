//! Wraps teloxide::Bot and implements [`topicast_core::Bot`]. Production code talks to Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ThreadId},
    ApiError, RequestError,
};
use topicast_core::{
    parse_message_id, Bot as CoreBot, Chat, DbotError, Keyboard, PhotoRef, Result, Target,
};

/// Converts a core keyboard into a Telegram inline keyboard.
pub fn to_inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn thread(target: &Target) -> ThreadId {
    ThreadId(MessageId(target.thread_id))
}

fn bot_error(e: RequestError) -> DbotError {
    DbotError::Bot(e.to_string())
}

/// Thin wrapper around teloxide::Bot that implements topicast-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_prompt(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(to_inline_markup(keyboard))
            .await
            .map_err(bot_error)?;
        Ok(sent.id.to_string())
    }

    async fn edit_prompt(
        &self,
        chat: &Chat,
        prompt_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let id = parse_message_id(prompt_id)?;
        let request = self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text.to_string());
        let result = match keyboard {
            Some(kb) => request.reply_markup(to_inline_markup(kb)).await,
            None => request.await,
        };
        match result {
            Ok(_) => Ok(()),
            // Pressing the same button twice renders identical content.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(bot_error(e)),
        }
    }

    async fn send_text(&self, target: &Target, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(target.chat_id), text.to_string())
            .message_thread_id(thread(target))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_photo(&self, target: &Target, photo: &PhotoRef, caption: &str) -> Result<()> {
        self.bot
            .send_photo(
                ChatId(target.chat_id),
                InputFile::file_id(FileId(photo.0.clone())),
            )
            .message_thread_id(thread(target))
            .caption(caption.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}
