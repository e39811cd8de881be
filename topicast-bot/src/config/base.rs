//! Base config: Telegram connection, logging, broadcast table location, operator allowlist. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use topicast_telegram::TelegramConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/topicast.log";
pub const DEFAULT_BROADCAST_CONFIG: &str = "config/broadcast.toml";

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN, TELEGRAM_API_URL / TELOXIDE_API_URL
    pub telegram: TelegramConfig,
    /// LOG_FILE
    pub log_file: String,
    /// BROADCAST_CONFIG: TOML file with destinations and topics
    pub broadcast_config_path: String,
    /// ALLOWED_USER_IDS (comma-separated); empty allows everyone
    pub allowed_users: Vec<i64>,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN, `config_path` overrides BROADCAST_CONFIG.
    pub fn load(token: Option<String>, config_path: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::from_env(token)?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let broadcast_config_path = broadcast_config_path(config_path);
        let allowed_users = match env::var("ALLOWED_USER_IDS") {
            Ok(raw) => parse_user_ids(&raw).context("ALLOWED_USER_IDS")?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            telegram,
            log_file,
            broadcast_config_path,
            allowed_users,
        })
    }

    /// Validate config (token present, API URL parses).
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()
    }
}

/// Table file location: explicit override, then BROADCAST_CONFIG, then the default path.
pub fn broadcast_config_path(config_path: Option<String>) -> String {
    config_path
        .or_else(|| env::var("BROADCAST_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_BROADCAST_CONFIG.to_string())
}

/// Parses "1, 2,3" into ids. Blank input yields an empty list.
pub fn parse_user_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("Invalid user id: {}", s))
        })
        .collect()
}
