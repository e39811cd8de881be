//! [`Handler`] that routes inbound messages into per-operator broadcast sessions.

use std::sync::Arc;

use async_trait::async_trait;
use topicast_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

use crate::config::BroadcastConfig;
use crate::controller::{Conversation, Event};
use crate::session::{SessionKey, SessionStore};

/// Owns the session store and the conversation driver. `/start` opens a session; every other
/// event is applied to the operator's open session, or ignored when there is none.
pub struct ConversationHandler {
    conversation: Conversation,
    sessions: SessionStore,
}

impl ConversationHandler {
    pub fn new(config: Arc<BroadcastConfig>, bot: Arc<dyn Bot>) -> Self {
        Self {
            conversation: Conversation::new(config, bot),
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

fn session_key(message: &Message) -> SessionKey {
    SessionKey {
        chat_id: message.chat.id,
        user_id: message.user.id,
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let key = session_key(message);
        let event = Event::from_content(&message.content);

        let Some(mut session) = self.sessions.take(&key).await else {
            if event == Event::Start {
                let session = self.conversation.start(&message.chat).await?;
                self.sessions.put(key, session).await;
                return Ok(HandlerResponse::Stop);
            }
            debug!(content = message.content.kind(), "No active broadcast session, ignoring");
            return Ok(HandlerResponse::Ignore);
        };

        let result = self
            .conversation
            .step(&mut session, &message.chat, event)
            .await;

        if session.is_done() {
            info!("step: broadcast session closed");
        }
        self.sessions.put(key, session).await;

        result.map(|_| HandlerResponse::Stop)
    }
}
