//! Shared helpers for broadcast integration tests: a recording [`MockBot`] and message builders.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use broadcast::{BroadcastConfig, Destination, Topic};
use chrono::Utc;
use topicast_core::{
    Bot, Chat, DbotError, Keyboard, Message, MessageContent, PhotoRef, Result, Target, User,
};

pub const OPERATOR_CHAT: i64 = 42;
pub const OPERATOR_ID: i64 = 7;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Message {
        chat_id: i64,
        text: String,
    },
    Prompt {
        chat_id: i64,
        prompt_id: String,
        text: String,
        buttons: Vec<(String, String)>,
    },
    Edit {
        chat_id: i64,
        prompt_id: String,
        text: String,
        buttons: Option<Vec<(String, String)>>,
    },
    Text {
        chat_id: i64,
        thread_id: i32,
        text: String,
    },
    Photo {
        chat_id: i64,
        thread_id: i32,
        photo: String,
        caption: String,
    },
}

fn buttons(keyboard: &Keyboard) -> Vec<(String, String)> {
    keyboard
        .buttons()
        .map(|b| (b.label.clone(), b.data.clone()))
        .collect()
}

/// Mock Bot that records every call. Sends to chats in `failing` return an error after being recorded.
/// Prompt ids are "1", "2", ... in send order.
#[derive(Default)]
pub struct MockBot {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<i64>,
    next_prompt: AtomicUsize,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_for(chat_ids: &[i64]) -> Arc<Self> {
        Arc::new(Self {
            failing: chat_ids.iter().copied().collect(),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn last(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Broadcast sends (text and photo) in call order.
    pub fn deliveries(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Text { .. } | Call::Photo { .. }))
            .collect()
    }

    /// Notices sent to the operator chat.
    pub fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Id of the most recently sent prompt.
    pub fn last_prompt_id(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Prompt { prompt_id, .. } => Some(prompt_id),
            _ => None,
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn delivery_result(&self, chat_id: i64) -> Result<()> {
        if self.failing.contains(&chat_id) {
            Err(DbotError::Bot(format!(
                "Forbidden: bot is not a member of chat {}",
                chat_id
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Call::Message {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_prompt(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<String> {
        let prompt_id = (self.next_prompt.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        self.record(Call::Prompt {
            chat_id: chat.id,
            prompt_id: prompt_id.clone(),
            text: text.to_string(),
            buttons: buttons(keyboard),
        });
        Ok(prompt_id)
    }

    async fn edit_prompt(
        &self,
        chat: &Chat,
        prompt_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.record(Call::Edit {
            chat_id: chat.id,
            prompt_id: prompt_id.to_string(),
            text: text.to_string(),
            buttons: keyboard.map(buttons),
        });
        Ok(())
    }

    async fn send_text(&self, target: &Target, text: &str) -> Result<()> {
        self.record(Call::Text {
            chat_id: target.chat_id,
            thread_id: target.thread_id,
            text: text.to_string(),
        });
        self.delivery_result(target.chat_id)
    }

    async fn send_photo(&self, target: &Target, photo: &PhotoRef, caption: &str) -> Result<()> {
        self.record(Call::Photo {
            chat_id: target.chat_id,
            thread_id: target.thread_id,
            photo: photo.0.clone(),
            caption: caption.to_string(),
        });
        self.delivery_result(target.chat_id)
    }
}

/// Destinations {A:100, B:200}; topics {"News": {100:11, 200:2}, "Events": {100:6}}.
pub fn sample_config() -> Arc<BroadcastConfig> {
    Arc::new(
        BroadcastConfig::new(
            vec![Destination::new("A", 100), Destination::new("B", 200)],
            vec![
                Topic::new("News", [(100, 11), (200, 2)]),
                Topic::new("Events", [(100, 6)]),
            ],
        )
        .unwrap(),
    )
}

pub fn operator_chat() -> Chat {
    Chat {
        id: OPERATOR_CHAT,
        chat_type: "private".to_string(),
    }
}

pub fn message(content: MessageContent) -> Message {
    Message {
        id: "1".to_string(),
        user: User {
            id: OPERATOR_ID,
            username: Some("operator".to_string()),
            first_name: Some("Op".to_string()),
            last_name: None,
        },
        chat: operator_chat(),
        content,
        created_at: Utc::now(),
    }
}

pub fn start() -> Message {
    message(MessageContent::Command("start".to_string()))
}

pub fn press(data: &str, prompt_id: &str) -> Message {
    message(MessageContent::Callback {
        data: data.to_string(),
        prompt_id: Some(prompt_id.to_string()),
    })
}

pub fn text(body: &str) -> Message {
    message(MessageContent::Text(body.to_string()))
}

pub fn photo(file_id: &str) -> Message {
    message(MessageContent::Photo {
        photo: PhotoRef(file_id.to_string()),
        caption: None,
    })
}
