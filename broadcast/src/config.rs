//! Destination and topic tables.
//!
//! Loaded once at startup from TOML and shared read-only afterwards:
//!
//! ```toml
//! [[destinations]]
//! name = "Test2"
//! chat_id = -1002501155082
//!
//! [[topics]]
//! name = "News"
//! threads = [{ chat_id = -1002501155082, thread_id = 11 }]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Callback payload of the proceed button; cannot be used as a destination name.
pub const PROCEED: &str = "next";

/// Telegram limits callback data to 64 bytes; names travel as callback data.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// A target group chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub chat_id: i64,
}

impl Destination {
    pub fn new(name: impl Into<String>, chat_id: i64) -> Self {
        Self {
            name: name.into(),
            chat_id,
        }
    }
}

/// A named thread that exists in one or more destination chats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    threads: BTreeMap<i64, i32>,
}

impl Topic {
    pub fn new(name: impl Into<String>, threads: impl IntoIterator<Item = (i64, i32)>) -> Self {
        Self {
            name: name.into(),
            threads: threads.into_iter().collect(),
        }
    }

    /// Thread id of this topic inside `chat_id`.
    pub fn thread_for(&self, chat_id: i64) -> Option<i32> {
        self.threads.get(&chat_id).copied()
    }

    /// True when every chat id has a thread for this topic.
    pub fn covers(&self, chat_ids: &[i64]) -> bool {
        chat_ids.iter().all(|id| self.threads.contains_key(id))
    }

    pub fn threads(&self) -> impl Iterator<Item = (i64, i32)> + '_ {
        self.threads.iter().map(|(c, t)| (*c, *t))
    }
}

#[derive(Debug, Deserialize)]
struct ThreadEntry {
    chat_id: i64,
    thread_id: i32,
}

#[derive(Debug, Deserialize)]
struct TopicEntry {
    name: String,
    #[serde(default)]
    threads: Vec<ThreadEntry>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    destinations: Vec<Destination>,
    #[serde(default)]
    topics: Vec<TopicEntry>,
}

/// Validated destination and topic tables. Order of both tables is the configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastConfig {
    destinations: Vec<Destination>,
    topics: Vec<Topic>,
}

impl BroadcastConfig {
    /// Builds and validates the tables.
    pub fn new(destinations: Vec<Destination>, topics: Vec<Topic>) -> Result<Self, ConfigError> {
        let config = Self {
            destinations,
            topics,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text. Duplicate thread entries inside one topic are rejected.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut topics = Vec::with_capacity(file.topics.len());
        for entry in file.topics {
            let mut seen = HashSet::new();
            for t in &entry.threads {
                if !seen.insert(t.chat_id) {
                    return Err(ConfigError::DuplicateThread {
                        topic: entry.name.clone(),
                        chat_id: t.chat_id,
                    });
                }
            }
            topics.push(Topic::new(
                entry.name,
                entry.threads.into_iter().map(|t| (t.chat_id, t.thread_id)),
            ));
        }
        Self::new(file.destinations, topics)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations.is_empty() {
            return Err(ConfigError::NoDestinations);
        }

        let mut names = HashSet::new();
        let mut chat_ids = HashSet::new();
        for d in &self.destinations {
            check_name(&d.name)?;
            if d.name == PROCEED {
                return Err(ConfigError::ReservedName(d.name.clone()));
            }
            if !names.insert(d.name.as_str()) {
                return Err(ConfigError::DuplicateDestination(d.name.clone()));
            }
            if !chat_ids.insert(d.chat_id) {
                return Err(ConfigError::DuplicateChatId(d.chat_id));
            }
        }

        let mut topic_names = HashSet::new();
        for t in &self.topics {
            check_name(&t.name)?;
            if !topic_names.insert(t.name.as_str()) {
                return Err(ConfigError::DuplicateTopic(t.name.clone()));
            }
            if t.threads.is_empty() {
                return Err(ConfigError::EmptyTopic(t.name.clone()));
            }
            if let Some(chat_id) = t.threads.keys().find(|id| !chat_ids.contains(*id)) {
                return Err(ConfigError::UnknownChat {
                    topic: t.name.clone(),
                    chat_id: *chat_id,
                });
            }
        }
        Ok(())
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn destination(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name == name)
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Chat ids of the named destinations, in configuration order. Unknown names are skipped.
    pub fn chat_ids<'a, I>(&self, names: I) -> Vec<i64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = names.into_iter().collect();
        self.destinations
            .iter()
            .filter(|d| wanted.contains(d.name.as_str()))
            .map(|d| d.chat_id)
            .collect()
    }

    /// Topics defining a thread for every given chat id, in configuration order.
    pub fn available_topics(&self, chat_ids: &[i64]) -> Vec<&Topic> {
        self.topics.iter().filter(|t| t.covers(chat_ids)).collect()
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::EmptyName);
    }
    if name.len() > MAX_CALLBACK_DATA_LEN {
        return Err(ConfigError::NameTooLong {
            name: name.to_string(),
            max: MAX_CALLBACK_DATA_LEN,
        });
    }
    Ok(())
}
