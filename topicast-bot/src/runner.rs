use anyhow::{Context, Result};
use broadcast::BroadcastConfig;
use handler_chain::HandlerChain;
use std::fmt::Write;
use std::sync::Arc;
use topicast_core::{init_tracing, Bot};
use topicast_telegram::run_dispatcher;
use tracing::{info, instrument};

use super::components::{build_bot_components, build_handler_chain};
use super::config::{broadcast_config_path, BotConfig};

/// Main entry: validate config, init logging, build components and the chain, then dispatch
/// updates until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        tables = %config.base().broadcast_config_path,
        destinations = config.broadcast().destinations().len(),
        topics = config.broadcast().topics().len(),
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let handler_chain = build_handler_chain(&config, components.bot_adapter.clone());

    info!("Bot started successfully");

    run_dispatcher(components.teloxide_bot, handler_chain).await
}

/// Builds the handler chain around `bot` without touching Telegram. Used by integration tests
/// that drive the chain with fake events.
pub fn build_chain_only(config: &BotConfig, bot: Arc<dyn Bot>) -> Result<HandlerChain> {
    config.validate()?;
    Ok(build_handler_chain(config, bot))
}

/// Loads the tables for `check`: `config_path`, else BROADCAST_CONFIG, else the default path.
pub fn load_tables(config_path: Option<String>) -> Result<BroadcastConfig> {
    let path = broadcast_config_path(config_path);
    BroadcastConfig::load(&path).with_context(|| format!("Load broadcast tables from {}", path))
}

/// Human-readable summary printed by `topicast check`.
pub fn check_report(config: &BroadcastConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Destinations ({}):", config.destinations().len());
    for dest in config.destinations() {
        let topics: Vec<&str> = config
            .available_topics(&[dest.chat_id])
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        let _ = writeln!(
            out,
            "  {} ({}): {}",
            dest.name,
            dest.chat_id,
            if topics.is_empty() {
                "no topics".to_string()
            } else {
                topics.join(", ")
            }
        );
    }

    let _ = writeln!(out, "Topics ({}):", config.topics().len());
    for topic in config.topics() {
        let threads: Vec<String> = topic
            .threads()
            .map(|(chat_id, thread_id)| format!("{}#{}", chat_id, thread_id))
            .collect();
        let _ = writeln!(out, "  {}: {}", topic.name, threads.join(", "));
    }
    out
}
