//! Dispatcher loop: converts teloxide messages and callback queries into core::Message and hands
//! them to the HandlerChain.
//!
//! teloxide's default distribution serialises updates per chat, so one operator's events are
//! processed one at a time and in order.

use anyhow::Result;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use topicast_core::{Message as CoreMessage, ToCoreMessage};
use tracing::{error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

/// Starts the dispatcher with the given teloxide Bot and HandlerChain. Runs until Ctrl-C.
#[instrument(skip(bot, handler_chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                info!(username = %username, "Bot identity resolved");
            }
        }
        Err(e) => warn!(error = %e, "get_me failed, continuing"),
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn on_message(msg: teloxide::types::Message, chain: HandlerChain) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        content = core_msg.content.kind(),
        "Received message"
    );
    run_chain(&chain, &core_msg).await;
    Ok(())
}

async fn on_callback(
    bot: teloxide::Bot,
    q: CallbackQuery,
    chain: HandlerChain,
) -> ResponseResult<()> {
    // Stops the client-side spinner; the chain's own edits carry the feedback.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, "answer_callback_query failed");
    }

    let core_msg = TelegramCallbackWrapper(&q).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        data = ?q.data,
        "Received callback"
    );
    run_chain(&chain, &core_msg).await;
    Ok(())
}

async fn run_chain(chain: &HandlerChain, message: &CoreMessage) {
    if let Err(e) = chain.handle(message).await {
        error!(error = %e, user_id = message.user.id, "Handler chain failed");
    }
}
