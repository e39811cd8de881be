//! Adapters from Telegram (teloxide) types to topicast_core types.
//! Depends only on teloxide and topicast_core type definitions.

use teloxide::types::{CallbackQuery, PhotoSize};
use topicast_core::{Chat, Message, MessageContent, PhotoRef, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn unknown_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

/// Extracts the command name from `/name@bot args`. Returns None for non-command text.
pub fn parse_command(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}

/// Largest size of a photo; Telegram lists sizes in ascending order.
fn largest_photo(sizes: &[PhotoSize]) -> Option<PhotoRef> {
    sizes.last().map(|p| PhotoRef(p.file.id.to_string()))
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    fn content(&self) -> MessageContent {
        if let Some(photo) = self.0.photo().and_then(largest_photo) {
            return MessageContent::Photo {
                photo,
                caption: self.0.caption().map(str::to_string),
            };
        }
        match self.0.text() {
            Some(text) => match parse_command(text) {
                Some(name) => MessageContent::Command(name),
                None => MessageContent::Text(text.to_string()),
            },
            None => MessageContent::Other,
        }
    }
}

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(unknown_user),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: format!("{:?}", self.0.chat.kind),
            },
            content: self.content(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Wraps a teloxide CallbackQuery (inline button press) for conversion to core [`Message`].
///
/// The chat is the one holding the pressed keyboard; when that message is unavailable the
/// presser's private chat (same id as the user) is assumed.
pub struct TelegramCallbackWrapper<'a>(pub &'a CallbackQuery);

impl<'a> ToCoreMessage for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Message {
        let q = self.0;
        let user = TelegramUserWrapper(&q.from).to_core();
        let chat = match &q.message {
            Some(m) => Chat {
                id: m.chat().id.0,
                chat_type: format!("{:?}", m.chat().kind),
            },
            None => Chat {
                id: user.id,
                chat_type: "private".to_string(),
            },
        };
        Message {
            id: q.id.to_string(),
            content: MessageContent::Callback {
                data: q.data.clone().unwrap_or_default(),
                prompt_id: q.message.as_ref().map(|m| m.id().to_string()),
            },
            user,
            chat,
            created_at: chrono::Utc::now(),
        }
    }
}
