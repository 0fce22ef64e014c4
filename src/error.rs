//! Error types shared by the Unsplash client and the bot handlers.

use thiserror::Error;

/// Everything that can go wrong between a user action and the Unsplash API.
///
/// Handlers catch these at the boundary and turn them into a short chat
/// message for the requesting user; none of them abort the process.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unsplash returned {status}: {message}")]
    RemoteApi { status: u16, message: String },
    #[error("you are not authorized yet, send /authorize first")]
    Unauthorized,
    #[error("malformed callback payload: {0}")]
    MalformedCallback(String),
}
