//! BotConfig: BaseConfig + the validated broadcast tables. Use load() for env-based loading.

use anyhow::{Context, Result};
use broadcast::BroadcastConfig;
use std::sync::Arc;

use super::BaseConfig;

/// Full bot config: process settings plus the destination/topic tables they point to.
pub struct BotConfig {
    pub base: BaseConfig,
    pub broadcast: Arc<BroadcastConfig>,
}

impl BotConfig {
    /// Loads env settings, then reads and validates the broadcast tables file.
    pub fn load(token: Option<String>, config_path: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token, config_path)?;
        let broadcast = BroadcastConfig::load(&base.broadcast_config_path).with_context(|| {
            format!(
                "Load broadcast tables from {} (set BROADCAST_CONFIG or --config)",
                base.broadcast_config_path
            )
        })?;
        Ok(Self {
            base,
            broadcast: Arc::new(broadcast),
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }

    pub fn broadcast(&self) -> Arc<BroadcastConfig> {
        self.broadcast.clone()
    }

    pub fn bot_token(&self) -> &str {
        &self.base.telegram.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram.telegram_api_url.as_deref()
    }
    pub fn allowed_users(&self) -> &[i64] {
        &self.base.allowed_users
    }
}
