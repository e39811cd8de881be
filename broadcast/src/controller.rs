//! Conversation controller: drives one [`Session`] through the broadcast flow.
//!
//! ```text
//! start ─▶ SelectingDestinations ──next──▶ SelectingTopic ──topic──▶ AwaitingText
//!              │ toggle (stay)   │ empty (stay)                         │ text
//!              ▼                 ▼ no common topic ─▶ Done              ▼
//!                                          AwaitingPhotoOrConfirmation ──photo / "no"──▶ deliver ─▶ Done
//! ```
//!
//! Any other (state, event) pair re-sends the prompt of the current state.

use std::sync::Arc;

use topicast_core::{
    Bot, Button, Chat, DbotError, HandlerError, Keyboard, MessageContent, PhotoRef, Result,
};
use tracing::{debug, info, instrument};

use crate::config::{BroadcastConfig, PROCEED};
use crate::dispatcher::{self, DeliveryReport};
use crate::error::ConversationError;
use crate::session::{Session, State};
use crate::texts;

/// Inbound event as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    /// Button press with its payload and the id of the prompt that carried the button.
    Choice {
        data: String,
        prompt_id: Option<String>,
    },
    Text(String),
    Photo(PhotoRef),
    /// Any command other than `/start`.
    Command(String),
    Unsupported,
}

impl Event {
    pub fn from_content(content: &MessageContent) -> Self {
        match content {
            MessageContent::Command(name) if name == "start" => Event::Start,
            MessageContent::Command(name) => Event::Command(name.clone()),
            MessageContent::Text(text) => Event::Text(text.clone()),
            MessageContent::Photo { photo, .. } => Event::Photo(photo.clone()),
            MessageContent::Callback { data, prompt_id } => Event::Choice {
                data: data.clone(),
                prompt_id: prompt_id.clone(),
            },
            MessageContent::Other => Event::Unsupported,
        }
    }
}

/// Stateless driver shared by all sessions: read-only tables plus the outbound bot.
#[derive(Clone)]
pub struct Conversation {
    config: Arc<BroadcastConfig>,
    bot: Arc<dyn Bot>,
}

impl Conversation {
    pub fn new(config: Arc<BroadcastConfig>, bot: Arc<dyn Bot>) -> Self {
        Self { config, bot }
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Opens a session and shows the destination toggle list.
    #[instrument(skip(self, chat), fields(chat_id = chat.id))]
    pub async fn start(&self, chat: &Chat) -> Result<Session> {
        let mut session = Session::new();
        let prompt_id = self
            .bot
            .send_prompt(chat, texts::CHOOSE_DESTINATIONS, &self.destinations_keyboard(&session))
            .await?;
        session.set_prompt_id(prompt_id);
        info!(chat_id = chat.id, "step: broadcast session started");
        Ok(session)
    }

    /// Applies one event to the session.
    #[instrument(skip(self, session, chat, event), fields(chat_id = chat.id, state = session.state().as_str()))]
    pub async fn step(&self, session: &mut Session, chat: &Chat, event: Event) -> Result<()> {
        match (session.state(), event) {
            (State::SelectingDestinations, Event::Choice { data, prompt_id })
                if self.is_current_prompt(session, prompt_id.as_deref()) =>
            {
                if data == PROCEED {
                    self.proceed(session, chat).await
                } else if self.config.destination(&data).is_some() {
                    let selected = session.toggle(&data);
                    debug!(destination = %data, selected, "Destination toggled");
                    let keyboard = self.destinations_keyboard(session);
                    self.show_prompt(session, chat, texts::CHOOSE_DESTINATIONS, Some(&keyboard))
                        .await
                } else {
                    self.reprompt(session, chat).await
                }
            }
            (State::SelectingTopic, Event::Choice { data, prompt_id })
                if self.is_current_prompt(session, prompt_id.as_deref()) =>
            {
                if session.choose_topic(&data) {
                    info!(topic = %data, "step: topic selected");
                    self.show_prompt(session, chat, &texts::topic_selected(&data), None)
                        .await
                } else {
                    self.reprompt(session, chat).await
                }
            }
            (State::AwaitingText, Event::Text(text)) => {
                session.set_text(text);
                info!("step: message text recorded");
                self.bot.send_message(chat, texts::ATTACH_PHOTO).await
            }
            (State::AwaitingPhotoOrConfirmation, Event::Photo(photo)) => {
                session.attach_photo(photo);
                self.broadcast(session, chat).await.map(|_| ())
            }
            (State::AwaitingPhotoOrConfirmation, Event::Text(text)) if texts::is_decline(&text) => {
                self.broadcast(session, chat).await.map(|_| ())
            }
            (State::Done, _) => Ok(()),
            (state, event) => {
                debug!(state = state.as_str(), event = ?event, "Unhandled event, re-prompting");
                self.reprompt(session, chat).await
            }
        }
    }

    async fn proceed(&self, session: &mut Session, chat: &Chat) -> Result<()> {
        match session.proceed(&self.config) {
            Ok(topics) => {
                info!(
                    selected = session.selected().len(),
                    topics = topics.len(),
                    "step: destinations confirmed"
                );
                self.show_prompt(
                    session,
                    chat,
                    texts::CHOOSE_TOPIC,
                    Some(&topics_keyboard(&topics)),
                )
                .await
            }
            Err(ConversationError::EmptySelection) => {
                debug!("Proceed with empty selection");
                let keyboard = self.destinations_keyboard(session);
                self.show_prompt(session, chat, &texts::empty_selection(), Some(&keyboard))
                    .await
            }
            Err(ConversationError::NoCommonTopic) => {
                info!(selected = ?session.selected(), "step: no common topic, session ended");
                self.show_prompt(session, chat, texts::NO_COMMON_TOPIC, None)
                    .await
            }
            Err(e) => Err(state_error(e)),
        }
    }

    /// Delivers the composed message, reports each failed destination, then acknowledges.
    async fn broadcast(&self, session: &mut Session, chat: &Chat) -> Result<DeliveryReport> {
        let topic = session
            .topic()
            .ok_or_else(|| state_error(ConversationError::IncompleteContent))?;
        let targets = dispatcher::resolve_targets(&self.config, session.selected(), topic)
            .map_err(state_error)?;
        let payload = session.payload().map_err(state_error)?;

        info!(topic = %topic, targets = targets.len(), "step: broadcast started");
        let report = dispatcher::deliver(self.bot.as_ref(), &targets, &payload).await;
        session.finish();

        for failure in &report.failures {
            self.bot
                .send_message(
                    chat,
                    &texts::delivery_failed(failure.target.chat_id, &failure.reason),
                )
                .await?;
        }
        self.bot.send_message(chat, texts::DELIVERED).await?;

        info!(
            delivered = report.delivered.len(),
            failed = report.failures.len(),
            "step: broadcast finished"
        );
        Ok(report)
    }

    /// Re-sends the prompt of the current state as a new message.
    async fn reprompt(&self, session: &mut Session, chat: &Chat) -> Result<()> {
        match session.state() {
            State::SelectingDestinations => {
                let id = self
                    .bot
                    .send_prompt(
                        chat,
                        texts::CHOOSE_DESTINATIONS,
                        &self.destinations_keyboard(session),
                    )
                    .await?;
                session.set_prompt_id(id);
                Ok(())
            }
            State::SelectingTopic => {
                let id = self
                    .bot
                    .send_prompt(
                        chat,
                        texts::CHOOSE_TOPIC,
                        &topics_keyboard(session.offered_topics()),
                    )
                    .await?;
                session.set_prompt_id(id);
                Ok(())
            }
            State::AwaitingText => self.bot.send_message(chat, texts::ENTER_TEXT).await,
            State::AwaitingPhotoOrConfirmation => {
                self.bot.send_message(chat, texts::ATTACH_PHOTO).await
            }
            State::Done => Ok(()),
        }
    }

    /// Edits the session's prompt in place, or sends a new one when there is none yet.
    async fn show_prompt(
        &self,
        session: &mut Session,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        if let Some(id) = session.prompt_id() {
            return self.bot.edit_prompt(chat, id, text, keyboard).await;
        }
        match keyboard {
            Some(kb) => {
                let id = self.bot.send_prompt(chat, text, kb).await?;
                session.set_prompt_id(id);
                Ok(())
            }
            None => self.bot.send_message(chat, text).await,
        }
    }

    /// Buttons pressed on an older prompt do not drive the session.
    fn is_current_prompt(&self, session: &Session, pressed: Option<&str>) -> bool {
        match (session.prompt_id(), pressed) {
            (Some(current), Some(pressed)) => current == pressed,
            _ => true,
        }
    }

    fn destinations_keyboard(&self, session: &Session) -> Keyboard {
        let mut keyboard = Keyboard::single_column(self.config.destinations().iter().map(|d| {
            Button::new(
                texts::destination_label(&d.name, session.is_selected(&d.name)),
                d.name.clone(),
            )
        }));
        keyboard.push_row(Button::new(texts::PROCEED_LABEL, PROCEED));
        keyboard
    }
}

fn topics_keyboard(topics: &[String]) -> Keyboard {
    Keyboard::single_column(topics.iter().map(|t| Button::new(t.clone(), t.clone())))
}

fn state_error(e: ConversationError) -> DbotError {
    DbotError::Handler(HandlerError::State(e.to_string()))
}
