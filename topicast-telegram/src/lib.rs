//! # topicast-telegram
//!
//! Telegram transport layer: adapters, [`topicast_core::Bot`] implementation, minimal config and
//! the dispatcher runner. Handles only Telegram connectivity and handler-chain execution; the
//! broadcast flow itself lives in the broadcast crate.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{
    parse_command, TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper,
};
pub use bot_adapter::{to_inline_markup, TelegramBotAdapter};
pub use config::TelegramConfig;
pub use runner::run_dispatcher;
