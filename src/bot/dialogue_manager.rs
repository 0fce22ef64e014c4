//! Dialogue Manager module for the authorization flow state transitions

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, warn};

// Import dialogue types
use crate::dialogue::{validate_auth_code, AuthDialogue, AuthState};

use super::AppState;

/// Starts the OAuth flow: sends the authorize link and marks this user as
/// awaiting a pasted code.
pub async fn start_authorization(
    bot: &Bot,
    msg: &Message,
    dialogue: AuthDialogue,
    state: &AppState,
) -> Result<()> {
    let authorize_url = state.unsplash.authorize_url();

    bot.send_message(
        msg.chat.id,
        format!(
            "Open this link, allow access to your Unsplash account, then \
             paste the code you get back here:\n{}",
            authorize_url
        ),
    )
    .await?;

    dialogue.update(AuthState::AwaitingAuthCode).await?;
    info!(user_id = %msg.chat.id, "Awaiting authorization code");

    Ok(())
}

/// Handles the pasted authorization code while the user is awaiting-code.
///
/// On success the token is stored for this user and the dialogue returns to
/// idle. On failure the user is told what went wrong and the dialogue stays
/// in awaiting-code so they can paste the code again or request a fresh
/// link; one bad code must never take the process down.
pub async fn handle_auth_code_input(
    bot: &Bot,
    msg: &Message,
    dialogue: AuthDialogue,
    state: &AppState,
    code_input: &str,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        warn!(chat_id = %msg.chat.id, "Authorization code without a sender, ignoring");
        return Ok(());
    };

    let code = match validate_auth_code(code_input) {
        Ok(code) => code,
        Err(_) => {
            bot.send_message(
                msg.chat.id,
                "That does not look like an authorization code, please paste it again.",
            )
            .await?;
            // Keep dialogue active, user can try again
            return Ok(());
        }
    };

    match state.unsplash.exchange_code(&code).await {
        Ok(token) => {
            state.tokens.insert(user.id, token.access_token).await;
            dialogue.update(AuthState::Idle).await?;
            info!(user_id = %user.id, "Access token stored");

            bot.send_message(
                msg.chat.id,
                "✅ Authorized! You can now like and unlike photos.",
            )
            .await?;
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Token exchange failed");

            bot.send_message(
                msg.chat.id,
                format!(
                    "Authorization failed: {}\n\
                     Paste the code again, or send /authorize for a fresh link.",
                    e
                ),
            )
            .await?;
            // Keep dialogue active, user can try again
        }
    }

    Ok(())
}
