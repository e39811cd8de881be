//! Bot configuration: BaseConfig (Telegram + log + table path + allowlist) + BroadcastConfig tables.

mod base;
mod bot_config;


pub use base::{
    broadcast_config_path, parse_user_ids, BaseConfig, DEFAULT_BROADCAST_CONFIG, DEFAULT_LOG_FILE,
};
pub use bot_config::BotConfig;
