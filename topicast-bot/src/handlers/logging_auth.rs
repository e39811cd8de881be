//! Handlers for logging and optional auth (allowlist).

use async_trait::async_trait;
use topicast_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument, warn};

/// Logs each event in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            chat_id = message.chat.id,
            content = message.content.kind(),
            "Received event"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed event"
        );
        Ok(())
    }
}

/// Drops events from users outside the allowlist. An empty allowlist lets everyone through.
pub struct AuthHandler {
    allowed_users: Vec<i64>,
}

impl AuthHandler {
    /// Creates a handler that allows only the given user ids.
    pub fn new(allowed_users: Vec<i64>) -> Self {
        Self { allowed_users }
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_users.is_empty() || self.allowed_users.contains(&user_id)
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id;
        if self.is_allowed(user_id) {
            debug!(user_id = user_id, "User authorized");
            Ok(true)
        } else {
            warn!(
                user_id = user_id,
                chat_id = message.chat.id,
                "Unauthorized access attempt, event dropped"
            );
            Ok(false)
        }
    }
}
