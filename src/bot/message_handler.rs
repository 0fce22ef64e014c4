//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

// Import dialogue types
use crate::dialogue::{AuthDialogue, AuthState};

// Import dialogue manager functions
use super::dialogue_manager::{handle_auth_code_input, start_authorization};

// Import UI builder functions
use super::ui_builder::{create_photo_keyboard, format_photo_message};

use super::AppState;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "what this bot does")]
    Start,
    #[command(description = "display this help")]
    Help,
    #[command(description = "search Unsplash photos, e.g. /search mountains")]
    Search(String),
    #[command(description = "connect your Unsplash account so like buttons work")]
    Authorize,
}

/// Entry point for messages that parsed as a known command. Commands always
/// win over a pending authorization dialogue, so /search works even while
/// the bot is waiting for a code.
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    dialogue: AuthDialogue,
    state: Arc<AppState>,
    cmd: Command,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command from user");

    match cmd {
        Command::Start => {
            let welcome_message = format!(
                "👋 I search photos on Unsplash.\n\n\
                 Send /search <query> to get a page of photos with like and \
                 download buttons.\n\
                 Send /authorize once to connect your Unsplash account, \
                 otherwise the like buttons cannot act on your behalf.\n\n\
                 {}",
                Command::descriptions()
            );
            bot.send_message(msg.chat.id, welcome_message).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Search(query) => {
            handle_search(&bot, &msg, &state, &query).await?;
        }
        Command::Authorize => {
            start_authorization(&bot, &msg, dialogue, &state).await?;
        }
    }

    Ok(())
}

/// Runs one search and sends one message per photo, in result order.
pub async fn handle_search(bot: &Bot, msg: &Message, state: &AppState, query: &str) -> Result<()> {
    let query = query.trim();

    if query.is_empty() {
        bot.send_message(msg.chat.id, "What do you want to search?")
            .await?;
        return Ok(());
    }

    let results = match state.unsplash.search_photos(query).await {
        Ok(results) => results,
        Err(e) => {
            error!(user_id = %msg.chat.id, query = %query, error = %e, "Search failed for user");
            bot.send_message(msg.chat.id, format!("Cannot search photos: {}", e))
                .await?;
            return Ok(());
        }
    };

    info!(
        user_id = %msg.chat.id,
        query = %query,
        photos = results.results.len(),
        total = results.total,
        "Sending search results"
    );

    for photo in &results.results {
        bot.send_message(msg.chat.id, format_photo_message(photo, query))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(create_photo_keyboard(&photo.id, photo.liked_by_user))
            .await?;
    }

    Ok(())
}

/// Plain-text messages: only meaningful while the sender is mid-authorization,
/// everything else is ignored. Unknown commands fall through the command
/// filter into here and are dropped so a stray "/foo" is never mistaken for
/// an authorization code.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: AuthDialogue,
    state: Arc<AppState>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(user_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };
    let text = text.trim();

    if text.starts_with('/') {
        debug!(user_id = %msg.chat.id, "Ignoring unknown command");
        return Ok(());
    }

    match dialogue.get().await?.unwrap_or_default() {
        AuthState::AwaitingAuthCode => handle_auth_code_input(&bot, &msg, dialogue, &state, text).await,
        AuthState::Idle => {
            debug!(user_id = %msg.chat.id, "Ignoring plain text outside of a dialogue");
            Ok(())
        }
    }
}
