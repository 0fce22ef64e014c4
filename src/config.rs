//! Runtime configuration: the three keys the bot needs to talk to Telegram
//! and Unsplash.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Credentials for the Telegram bot API and the Unsplash application.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token.
    pub bot_key: String,
    /// Unsplash application access key (public client id).
    pub unsplash_key: String,
    /// Unsplash application secret, used only for the token exchange.
    pub unsplash_secret: String,
}

impl BotConfig {
    /// Reads the configuration from a JSON file with the keys
    /// `bot_key`, `unsplash_key` and `unsplash_secret`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Reads the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bot_key: env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?,
            unsplash_key: env::var("UNSPLASH_ACCESS_KEY")
                .context("UNSPLASH_ACCESS_KEY must be set")?,
            unsplash_secret: env::var("UNSPLASH_SECRET_KEY")
                .context("UNSPLASH_SECRET_KEY must be set")?,
        })
    }

    /// Uses the JSON file named by `SPLASHBOT_CONFIG` when that variable is
    /// present, the environment otherwise.
    pub fn load() -> Result<Self> {
        match env::var("SPLASHBOT_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Self::from_env(),
        }
    }
}
