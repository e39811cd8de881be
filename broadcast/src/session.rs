//! Per-conversation selection state and the store that keeps one session per operator.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::Mutex;
use topicast_core::PhotoRef;

use crate::config::BroadcastConfig;
use crate::dispatcher::Payload;
use crate::error::ConversationError;

/// Conversation step. `Done` is terminal; a finished session is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    SelectingDestinations,
    SelectingTopic,
    AwaitingText,
    AwaitingPhotoOrConfirmation,
    Done,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::SelectingDestinations => "selecting_destinations",
            State::SelectingTopic => "selecting_topic",
            State::AwaitingText => "awaiting_text",
            State::AwaitingPhotoOrConfirmation => "awaiting_photo_or_confirmation",
            State::Done => "done",
        }
    }
}

/// Identifies one operator's conversation: the chat it runs in and the user driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

/// Mutable state of one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    state: State,
    selected: BTreeSet<String>,
    offered_topics: Vec<String>,
    topic: Option<String>,
    text: Option<String>,
    photo: Option<PhotoRef>,
    prompt_id: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session in `SelectingDestinations` with nothing selected.
    pub fn new() -> Self {
        Self {
            state: State::SelectingDestinations,
            selected: BTreeSet::new(),
            offered_topics: Vec::new(),
            topic: None,
            text: None,
            photo: None,
            prompt_id: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn offered_topics(&self) -> &[String] {
        &self.offered_topics
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }

    /// Id of the message holding the interactive keyboard.
    pub fn prompt_id(&self) -> Option<&str> {
        self.prompt_id.as_deref()
    }

    pub fn set_prompt_id(&mut self, prompt_id: impl Into<String>) {
        self.prompt_id = Some(prompt_id.into());
    }

    /// Flips membership of `name`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.selected.remove(name) {
            false
        } else {
            self.selected.insert(name.to_string());
            true
        }
    }

    /// Leaves destination selection.
    ///
    /// Empty selection fails with `EmptySelection` and changes nothing. No shared topic moves the
    /// session to `Done` and fails with `NoCommonTopic`. Otherwise the offered topic names are
    /// recorded and returned, and the session waits for a topic.
    pub fn proceed(&mut self, config: &BroadcastConfig) -> Result<Vec<String>, ConversationError> {
        if self.selected.is_empty() {
            return Err(ConversationError::EmptySelection);
        }

        let chat_ids = config.chat_ids(self.selected.iter().map(String::as_str));
        let topics: Vec<String> = config
            .available_topics(&chat_ids)
            .into_iter()
            .map(|t| t.name.clone())
            .collect();

        if topics.is_empty() {
            self.state = State::Done;
            return Err(ConversationError::NoCommonTopic);
        }

        self.offered_topics = topics.clone();
        self.state = State::SelectingTopic;
        Ok(topics)
    }

    /// Records the topic if it was offered. Returns false (and changes nothing) otherwise.
    pub fn choose_topic(&mut self, name: &str) -> bool {
        if self.state != State::SelectingTopic || !self.offered_topics.iter().any(|t| t == name) {
            return false;
        }
        self.topic = Some(name.to_string());
        self.state = State::AwaitingText;
        true
    }

    /// Records the message body verbatim.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.state = State::AwaitingPhotoOrConfirmation;
    }

    pub fn attach_photo(&mut self, photo: PhotoRef) {
        self.photo = Some(photo);
    }

    /// What to broadcast: the photo with the text as caption, or the text alone.
    pub fn payload(&self) -> Result<Payload, ConversationError> {
        let text = self
            .text
            .clone()
            .ok_or(ConversationError::IncompleteContent)?;
        Ok(match &self.photo {
            Some(photo) => Payload::Photo {
                photo: photo.clone(),
                caption: text,
            },
            None => Payload::Text(text),
        })
    }

    pub fn finish(&mut self) {
        self.state = State::Done;
    }
}

/// Active sessions keyed by operator. A session is taken out while one event is processed, so the
/// lock is never held across network calls.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the session for `key`.
    pub async fn take(&self, key: &SessionKey) -> Option<Session> {
        self.sessions.lock().await.remove(key)
    }

    /// Stores `session` unless it is done; a done session is dropped.
    pub async fn put(&self, key: SessionKey, session: Session) {
        if session.is_done() {
            return;
        }
        self.sessions.lock().await.insert(key, session);
    }

    pub async fn contains(&self, key: &SessionKey) -> bool {
        self.sessions.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
