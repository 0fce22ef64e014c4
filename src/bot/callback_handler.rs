//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use crate::error::BotError;

// Import UI builder functions
use super::ui_builder::{create_photo_keyboard, CallbackAction};

use super::AppState;

/// Handle callback queries from the photo button rows
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    state: Arc<AppState>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let data = q.data.as_deref().unwrap_or("");
    let notice = match CallbackAction::parse(data) {
        Ok(CallbackAction::Like(photo_id)) => {
            apply_like_action(&bot, &q, &state, &photo_id, true).await?
        }
        Ok(CallbackAction::Unlike(photo_id)) => {
            apply_like_action(&bot, &q, &state, &photo_id, false).await?
        }
        Ok(CallbackAction::Download(photo_id)) => {
            debug!(user_id = %q.from.id, photo_id = %photo_id, "Download requested");
            Some("Downloads are not supported yet.".to_string())
        }
        Err(e) => {
            warn!(user_id = %q.from.id, data = %data, error = %e, "Dropping malformed callback payload");
            None
        }
    };

    // Answer the callback query to remove the loading state
    let mut answer = bot.answer_callback_query(q.id);
    if let Some(text) = notice {
        answer = answer.text(text);
    }
    answer.await?;

    Ok(())
}

/// Calls the like or unlike endpoint for the pressing user, then refreshes
/// the button row of the message the button lives on. Returns the text to
/// answer the callback query with.
async fn apply_like_action(
    bot: &Bot,
    q: &teloxide::types::CallbackQuery,
    state: &AppState,
    photo_id: &str,
    like: bool,
) -> Result<Option<String>> {
    let Some(token) = state.tokens.get(q.from.id).await else {
        warn!(user_id = %q.from.id, photo_id = %photo_id, "Like action without a stored token");
        return Ok(Some(BotError::Unauthorized.to_string()));
    };

    let result = if like {
        state.unsplash.like_photo(photo_id, &token).await
    } else {
        state.unsplash.unlike_photo(photo_id, &token).await
    };

    match result {
        Ok(()) => {
            info!(user_id = %q.from.id, photo_id = %photo_id, liked = like, "Like state changed");

            // Re-render just the button row in place; the new row offers the
            // opposite action.
            if let Some(msg) = &q.message {
                match bot
                    .edit_message_reply_markup(msg.chat().id, msg.id())
                    .reply_markup(create_photo_keyboard(photo_id, like))
                    .await
                {
                    Ok(_) => (),
                    Err(e) => {
                        error!(user_id = %q.from.id, error = %e, "Failed to update button row")
                    }
                }
            }

            Ok(Some(if like {
                "❤️ Liked".to_string()
            } else {
                "💔 Like removed".to_string()
            }))
        }
        Err(e) => {
            error!(user_id = %q.from.id, photo_id = %photo_id, error = %e, "Like request failed");
            Ok(Some(format!("Cannot update like: {}", e)))
        }
    }
}
