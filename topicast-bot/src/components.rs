//! Component factory: builds the transport and the handler chain from config. Isolates assembly
//! logic from runner.

use anyhow::Result;
use broadcast::ConversationHandler;
use handler_chain::HandlerChain;
use std::sync::Arc;
use topicast_core::Bot;
use topicast_telegram::TelegramBotAdapter;
use tracing::{info, instrument};

use super::config::BotConfig;
use super::handlers::{AuthHandler, LoggingHandler};

/// Runtime dependencies produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    /// Outbound side of the conversation; the Telegram adapter over `teloxide_bot`.
    pub bot_adapter: Arc<dyn Bot>,
}

/// Builds the teloxide client (custom API URL applied) and its [`Bot`] adapter.
#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let teloxide_bot = config.base().telegram.build_bot()?;
    let bot_adapter: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    Ok(BotComponents {
        teloxide_bot,
        bot_adapter,
    })
}

/// Builds the handler chain (logging → auth → broadcast conversation).
pub fn build_handler_chain(config: &BotConfig, bot: Arc<dyn Bot>) -> HandlerChain {
    if config.allowed_users().is_empty() {
        info!("ALLOWED_USER_IDS not set, every user may broadcast");
    } else {
        info!(allowed = config.allowed_users().len(), "Operator allowlist enabled");
    }

    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AuthHandler::new(config.allowed_users().to_vec())))
        .add_handler(Arc::new(ConversationHandler::new(config.broadcast(), bot)))
}
