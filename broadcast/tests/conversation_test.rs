//! Integration tests for [`broadcast::ConversationHandler`] driven with fake operator messages.
//!
//! Covers: the destination toggle list, empty selection, topic filtering, photo and text
//! delivery, partial delivery failure, no common topic, and the re-prompt behaviour for
//! events a state does not accept.

mod common;

use std::sync::Arc;

use broadcast::{texts, BroadcastConfig, ConversationHandler, Destination, SessionKey, State, Topic};
use common::*;
use topicast_core::{Handler, HandlerResponse, MessageContent};

fn key() -> SessionKey {
    SessionKey {
        chat_id: OPERATOR_CHAT,
        user_id: OPERATOR_ID,
    }
}

async fn state_of(handler: &ConversationHandler) -> Option<State> {
    let session = handler.sessions().take(&key()).await?;
    let state = session.state();
    handler.sessions().put(key(), session).await;
    Some(state)
}

/// Runs /start, selects `destinations`, proceeds and returns the handler plus the prompt id.
async fn select(
    bot: &Arc<MockBot>,
    config: Arc<BroadcastConfig>,
    destinations: &[&str],
) -> (ConversationHandler, String) {
    let handler = ConversationHandler::new(config, bot.clone());
    handler.handle(&start()).await.unwrap();
    let prompt = bot.last_prompt_id().unwrap();
    for d in destinations {
        handler.handle(&press(d, &prompt)).await.unwrap();
    }
    handler.handle(&press("next", &prompt)).await.unwrap();
    (handler, prompt)
}

/// Runs the flow up to AwaitingPhotoOrConfirmation with topic "News" and text "Hello".
async fn compose(bot: &Arc<MockBot>) -> ConversationHandler {
    let (handler, prompt) = select(bot, sample_config(), &["A", "B"]).await;
    handler.handle(&press("News", &prompt)).await.unwrap();
    handler.handle(&text("Hello")).await.unwrap();
    assert_eq!(
        state_of(&handler).await,
        Some(State::AwaitingPhotoOrConfirmation)
    );
    handler
}

/// **Test: /start sends the toggle list with every destination and the proceed button.**
#[tokio::test]
async fn test_start_shows_destination_toggles() {
    let bot = MockBot::new();
    let handler = ConversationHandler::new(sample_config(), bot.clone());

    let response = handler.handle(&start()).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(
        bot.calls(),
        vec![Call::Prompt {
            chat_id: OPERATOR_CHAT,
            prompt_id: "1".to_string(),
            text: texts::CHOOSE_DESTINATIONS.to_string(),
            buttons: vec![
                ("A".to_string(), "A".to_string()),
                ("B".to_string(), "B".to_string()),
                (texts::PROCEED_LABEL.to_string(), "next".to_string()),
            ],
        }]
    );
    assert_eq!(state_of(&handler).await, Some(State::SelectingDestinations));
}

/// **Test: a toggle re-renders the same prompt with a check mark; a second toggle removes it.**
#[tokio::test]
async fn test_toggle_edits_prompt_in_place() {
    let bot = MockBot::new();
    let handler = ConversationHandler::new(sample_config(), bot.clone());
    handler.handle(&start()).await.unwrap();

    handler.handle(&press("A", "1")).await.unwrap();
    match bot.last().unwrap() {
        Call::Edit {
            prompt_id, buttons, ..
        } => {
            assert_eq!(prompt_id, "1");
            let buttons = buttons.unwrap();
            assert_eq!(buttons[0], ("✅ A".to_string(), "A".to_string()));
            assert_eq!(buttons[1], ("B".to_string(), "B".to_string()));
        }
        other => panic!("expected edit, got {:?}", other),
    }

    handler.handle(&press("A", "1")).await.unwrap();
    match bot.last().unwrap() {
        Call::Edit { buttons, .. } => {
            assert_eq!(buttons.unwrap()[0], ("A".to_string(), "A".to_string()));
        }
        other => panic!("expected edit, got {:?}", other),
    }
    assert_eq!(state_of(&handler).await, Some(State::SelectingDestinations));
}

/// **Test: proceeding with nothing selected shows the error with the keyboard and stays.**
#[tokio::test]
async fn test_proceed_with_empty_selection_reprompts() {
    let bot = MockBot::new();
    let (handler, _) = select(&bot, sample_config(), &[]).await;

    match bot.last().unwrap() {
        Call::Edit { text, buttons, .. } => {
            assert_eq!(text, texts::empty_selection());
            assert_eq!(buttons.unwrap().len(), 3);
        }
        other => panic!("expected edit, got {:?}", other),
    }
    assert_eq!(state_of(&handler).await, Some(State::SelectingDestinations));
}

/// **Test: selecting A and B offers only News; selecting A offers News and Events.**
#[tokio::test]
async fn test_available_topics_follow_selection() {
    let bot = MockBot::new();
    let (handler, _) = select(&bot, sample_config(), &["A", "B"]).await;
    match bot.last().unwrap() {
        Call::Edit { text, buttons, .. } => {
            assert_eq!(text, texts::CHOOSE_TOPIC);
            assert_eq!(
                buttons.unwrap(),
                vec![("News".to_string(), "News".to_string())]
            );
        }
        other => panic!("expected edit, got {:?}", other),
    }
    assert_eq!(state_of(&handler).await, Some(State::SelectingTopic));

    let bot = MockBot::new();
    select(&bot, sample_config(), &["A"]).await;
    match bot.last().unwrap() {
        Call::Edit { buttons, .. } => {
            let data: Vec<String> = buttons.unwrap().into_iter().map(|(_, d)| d).collect();
            assert_eq!(data, vec!["News", "Events"]);
        }
        other => panic!("expected edit, got {:?}", other),
    }
}

/// **Test: no topic shared by the selection ends the session with a notice.**
#[tokio::test]
async fn test_no_common_topic_ends_session() {
    let config = Arc::new(
        BroadcastConfig::new(
            vec![Destination::new("A", 100), Destination::new("B", 200)],
            vec![Topic::new("OnlyA", [(100, 1)])],
        )
        .unwrap(),
    );
    let bot = MockBot::new();
    let (handler, _) = select(&bot, config, &["A", "B"]).await;

    match bot.last().unwrap() {
        Call::Edit { text, buttons, .. } => {
            assert_eq!(text, texts::NO_COMMON_TOPIC);
            assert!(buttons.is_none());
        }
        other => panic!("expected edit, got {:?}", other),
    }
    assert!(handler.sessions().is_empty().await);
}

/// **Test: a topic that was not offered is ignored and the topic list is sent again.**
#[tokio::test]
async fn test_topic_not_offered_is_ignored() {
    let bot = MockBot::new();
    let (handler, prompt) = select(&bot, sample_config(), &["A", "B"]).await;

    handler.handle(&press("Events", &prompt)).await.unwrap();

    match bot.last().unwrap() {
        Call::Prompt { text, buttons, .. } => {
            assert_eq!(text, texts::CHOOSE_TOPIC);
            assert_eq!(buttons.len(), 1);
        }
        other => panic!("expected prompt, got {:?}", other),
    }
    assert_eq!(state_of(&handler).await, Some(State::SelectingTopic));
}

/// **Test: choosing a topic removes the keyboard and asks for the text.**
#[tokio::test]
async fn test_topic_choice_asks_for_text() {
    let bot = MockBot::new();
    let (handler, prompt) = select(&bot, sample_config(), &["A", "B"]).await;

    handler.handle(&press("News", &prompt)).await.unwrap();

    assert_eq!(
        bot.last().unwrap(),
        Call::Edit {
            chat_id: OPERATOR_CHAT,
            prompt_id: prompt,
            text: texts::topic_selected("News"),
            buttons: None,
        }
    );
    assert_eq!(state_of(&handler).await, Some(State::AwaitingText));

    handler.handle(&text("Hello")).await.unwrap();
    assert_eq!(bot.notices().last().unwrap(), texts::ATTACH_PHOTO);
}

/// **Test: a photo sends the photo with the text as caption to every thread exactly once.**
#[tokio::test]
async fn test_photo_is_broadcast_with_caption() {
    let bot = MockBot::new();
    let handler = compose(&bot).await;

    handler.handle(&photo("photo-1")).await.unwrap();

    assert_eq!(
        bot.deliveries(),
        vec![
            Call::Photo {
                chat_id: 100,
                thread_id: 11,
                photo: "photo-1".to_string(),
                caption: "Hello".to_string(),
            },
            Call::Photo {
                chat_id: 200,
                thread_id: 2,
                photo: "photo-1".to_string(),
                caption: "Hello".to_string(),
            },
        ]
    );
    assert_eq!(bot.notices().last().unwrap(), texts::DELIVERED);
    assert!(handler.sessions().is_empty().await);
}

/// **Test: replying "нет" or "NO" sends the text to every thread.**
#[tokio::test]
async fn test_decline_sends_text() {
    for reply in ["нет", "NO"] {
        let bot = MockBot::new();
        let handler = compose(&bot).await;

        handler.handle(&text(reply)).await.unwrap();

        assert_eq!(
            bot.deliveries(),
            vec![
                Call::Text {
                    chat_id: 100,
                    thread_id: 11,
                    text: "Hello".to_string(),
                },
                Call::Text {
                    chat_id: 200,
                    thread_id: 2,
                    text: "Hello".to_string(),
                },
            ]
        );
        assert_eq!(bot.notices().last().unwrap(), texts::DELIVERED);
        assert!(handler.sessions().is_empty().await);
    }
}

/// **Test: a failing destination is reported once and does not stop the batch or the acknowledgment.**
#[tokio::test]
async fn test_partial_failure_is_reported() {
    let bot = MockBot::failing_for(&[200]);
    let handler = compose(&bot).await;
    bot.clear();

    handler.handle(&text("no")).await.unwrap();

    assert_eq!(bot.deliveries().len(), 2);
    let notices = bot.notices();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].starts_with("Failed to send to chat 200:"));
    assert!(notices[0].contains("Forbidden"));
    assert_eq!(notices[1], texts::DELIVERED);
    assert!(handler.sessions().is_empty().await);
}

/// **Test: other text while waiting for a photo re-prompts and sends nothing.**
#[tokio::test]
async fn test_other_text_while_awaiting_photo_reprompts() {
    let bot = MockBot::new();
    let handler = compose(&bot).await;
    bot.clear();

    handler.handle(&text("maybe later")).await.unwrap();

    assert!(bot.deliveries().is_empty());
    assert_eq!(bot.notices(), vec![texts::ATTACH_PHOTO.to_string()]);
    assert_eq!(
        state_of(&handler).await,
        Some(State::AwaitingPhotoOrConfirmation)
    );
}

/// **Test: commands are not taken as the message body.**
#[tokio::test]
async fn test_command_is_not_message_text() {
    let bot = MockBot::new();
    let (handler, prompt) = select(&bot, sample_config(), &["A"]).await;
    handler.handle(&press("Events", &prompt)).await.unwrap();
    bot.clear();

    handler
        .handle(&message(MessageContent::Command("help".to_string())))
        .await
        .unwrap();

    assert_eq!(bot.notices(), vec![texts::ENTER_TEXT.to_string()]);
    assert_eq!(state_of(&handler).await, Some(State::AwaitingText));
}

/// **Test: /start during an open session re-prompts without resetting the selection.**
#[tokio::test]
async fn test_start_during_session_keeps_selection() {
    let bot = MockBot::new();
    let handler = ConversationHandler::new(sample_config(), bot.clone());
    handler.handle(&start()).await.unwrap();
    handler.handle(&press("B", "1")).await.unwrap();

    handler.handle(&start()).await.unwrap();

    match bot.last().unwrap() {
        Call::Prompt {
            prompt_id, buttons, ..
        } => {
            assert_eq!(prompt_id, "2");
            assert_eq!(buttons[1], ("✅ B".to_string(), "B".to_string()));
        }
        other => panic!("expected prompt, got {:?}", other),
    }

    // The old keyboard no longer drives the session.
    handler.handle(&press("A", "1")).await.unwrap();
    let session = handler.sessions().take(&key()).await.unwrap();
    assert!(!session.is_selected("A"));
    assert!(session.is_selected("B"));
}

/// **Test: events without an open session are ignored.**
#[tokio::test]
async fn test_events_without_session_are_ignored() {
    let bot = MockBot::new();
    let handler = ConversationHandler::new(sample_config(), bot.clone());

    assert_eq!(
        handler.handle(&text("hello")).await.unwrap(),
        HandlerResponse::Ignore
    );
    assert_eq!(
        handler.handle(&press("A", "9")).await.unwrap(),
        HandlerResponse::Ignore
    );
    assert!(bot.calls().is_empty());
}
