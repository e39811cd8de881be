//! Fan-out delivery: one send per selected destination, failures collected, never aborted.

use std::collections::BTreeSet;

use topicast_core::{Bot, PhotoRef, Target};
use tracing::{info, warn};

use crate::config::BroadcastConfig;
use crate::error::{ConversationError, DeliveryFailure};

/// What is sent to every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Photo { photo: PhotoRef, caption: String },
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<Target>,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves the thread of `topic` in every selected destination, in configuration order.
pub fn resolve_targets(
    config: &BroadcastConfig,
    selected: &BTreeSet<String>,
    topic: &str,
) -> Result<Vec<Target>, ConversationError> {
    let topic_cfg = config
        .topic(topic)
        .ok_or_else(|| ConversationError::UnknownTopic(topic.to_string()))?;

    config
        .chat_ids(selected.iter().map(String::as_str))
        .into_iter()
        .map(|chat_id| {
            topic_cfg
                .thread_for(chat_id)
                .map(|thread_id| Target { chat_id, thread_id })
                .ok_or_else(|| ConversationError::MissingThread {
                    topic: topic.to_string(),
                    chat_id,
                })
        })
        .collect()
}

/// Sends `payload` to each target exactly once. A failed send is recorded and the next target is
/// still attempted; nothing is retried.
pub async fn deliver(bot: &dyn Bot, targets: &[Target], payload: &Payload) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for target in targets {
        let result = match payload {
            Payload::Text(text) => bot.send_text(target, text).await,
            Payload::Photo { photo, caption } => bot.send_photo(target, photo, caption).await,
        };

        match result {
            Ok(()) => {
                info!(
                    chat_id = target.chat_id,
                    thread_id = target.thread_id,
                    "step: broadcast delivered"
                );
                report.delivered.push(*target);
            }
            Err(e) => {
                warn!(
                    chat_id = target.chat_id,
                    thread_id = target.thread_id,
                    error = %e,
                    "Broadcast delivery failed"
                );
                report.failures.push(DeliveryFailure {
                    target: *target,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
