//! # topicast-bot
//!
//! Application crate: loads env config and the broadcast tables, wires logging, auth and the
//! broadcast conversation into a handler chain, and runs it on the Telegram dispatcher.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig};
pub use handlers::{AuthHandler, LoggingHandler};
pub use runner::{build_chain_only, check_report, load_tables, run_bot};
