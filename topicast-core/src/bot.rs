//! Bot abstraction for prompts, notices and broadcast delivery.
//!
//! [`Bot`] is transport-agnostic; topicast-telegram implements it over teloxide and tests use
//! recording mocks.

use crate::error::{DbotError, Result};
use crate::types::{Chat, Keyboard, PhotoRef, Target};
use async_trait::async_trait;

/// Abstraction over the chat platform. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain notice to the operator's chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends an interactive prompt and returns its id for later [`Bot::edit_prompt`] calls.
    async fn send_prompt(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<String>;
    /// Replaces text and keyboard of a prompt in place. `None` removes the keyboard.
    async fn edit_prompt(
        &self,
        chat: &Chat,
        prompt_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;
    /// Posts text into a forum thread of a destination chat.
    async fn send_text(&self, target: &Target, text: &str) -> Result<()>;
    /// Posts a photo with caption into a forum thread of a destination chat.
    async fn send_photo(&self, target: &Target, photo: &PhotoRef, caption: &str) -> Result<()>;
}

/// Parses a prompt id string into a transport message id.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id for edit: {}", s)))
}
