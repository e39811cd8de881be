//! # broadcast
//!
//! The broadcast conversation: destination and topic tables ([`BroadcastConfig`]), per-operator
//! selection state ([`Session`]), the step-by-step controller ([`Conversation`]) and the fan-out
//! [`dispatcher`]. [`ConversationHandler`] plugs the whole flow into a handler chain.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod session;
pub mod texts;

pub use config::{BroadcastConfig, Destination, Topic, MAX_CALLBACK_DATA_LEN, PROCEED};
pub use controller::{Conversation, Event};
pub use dispatcher::{deliver, resolve_targets, DeliveryReport, Payload};
pub use error::{ConfigError, ConversationError, DeliveryFailure};
pub use handler::ConversationHandler;
pub use session::{Session, SessionKey, SessionStore, State};
