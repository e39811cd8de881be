use std::path::PathBuf;
use thiserror::Error;
use topicast_core::Target;

/// Errors raised while loading or validating the destination and topic tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read broadcast config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse broadcast config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("At least one destination must be configured")]
    NoDestinations,

    #[error("Destination and topic names must not be empty")]
    EmptyName,

    #[error("Name is reserved for the proceed button: {0}")]
    ReservedName(String),

    #[error("Name does not fit into {max} bytes of callback data: {name}")]
    NameTooLong { name: String, max: usize },

    #[error("Duplicate destination name: {0}")]
    DuplicateDestination(String),

    #[error("Duplicate destination chat id: {0}")]
    DuplicateChatId(i64),

    #[error("Duplicate topic name: {0}")]
    DuplicateTopic(String),

    #[error("Topic {0} has no threads")]
    EmptyTopic(String),

    #[error("Topic {topic} references unknown chat id {chat_id}")]
    UnknownChat { topic: String, chat_id: i64 },

    #[error("Topic {topic} lists chat id {chat_id} more than once")]
    DuplicateThread { topic: String, chat_id: i64 },
}

/// Conversation-level failures. All of them are scoped to one session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("No destination selected")]
    EmptySelection,

    #[error("No topic is shared by all selected destinations")]
    NoCommonTopic,

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Topic {topic} has no thread in chat {chat_id}")]
    MissingThread { topic: String, chat_id: i64 },

    #[error("Message content is incomplete")]
    IncompleteContent,
}

/// One destination that could not be reached during a broadcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("delivery to chat {} (thread {}) failed: {}", .target.chat_id, .target.thread_id, .reason)]
pub struct DeliveryFailure {
    pub target: Target,
    pub reason: String,
}
