//! # topicast-core
//!
//! Core types and traits for the broadcast bot: [`Bot`], [`Handler`], message, keyboard and target
//! types, and tracing initialization. Transport-agnostic; used by topicast-telegram, handler-chain
//! and broadcast.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Button, Chat, Handler, HandlerResponse, Keyboard, Message, MessageContent, PhotoRef, Target,
    ToCoreMessage, ToCoreUser, User,
};
