//! Operator-facing prompt texts and button labels.

pub const CHOOSE_DESTINATIONS: &str = "Choose chats for the broadcast:";
pub const PROCEED_LABEL: &str = "➡ Next";
pub const SELECTED_MARK: &str = "✅ ";
pub const EMPTY_SELECTION: &str = "❗ Select at least one chat first.";
pub const NO_COMMON_TOPIC: &str = "❗ No topic is shared by all selected chats.";
pub const CHOOSE_TOPIC: &str = "Choose a topic:";
pub const ENTER_TEXT: &str = "Enter the message text:";
pub const ATTACH_PHOTO: &str = "Want to attach a photo? Send it now or reply 'no'.";
pub const DELIVERED: &str = "✅ Message broadcast.";

/// Replies accepted as "no photo, send as text". Compared case-insensitively.
pub const DECLINE_WORDS: [&str; 2] = ["no", "нет"];

pub fn destination_label(name: &str, selected: bool) -> String {
    if selected {
        format!("{}{}", SELECTED_MARK, name)
    } else {
        name.to_string()
    }
}

pub fn topic_selected(topic: &str) -> String {
    format!("Topic selected: {}\n{}", topic, ENTER_TEXT)
}

pub fn empty_selection() -> String {
    format!("{}\n{}", EMPTY_SELECTION, CHOOSE_DESTINATIONS)
}

pub fn delivery_failed(chat_id: i64, error: &str) -> String {
    format!("Failed to send to chat {}: {}", chat_id, error)
}

/// True for "no" / "нет" in any letter case, ignoring surrounding whitespace.
pub fn is_decline(text: &str) -> bool {
    let reply = text.trim().to_lowercase();
    DECLINE_WORDS.iter().any(|w| *w == reply)
}
