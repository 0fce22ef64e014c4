use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use splashbot::bot::{self, AppState};
use splashbot::config::BotConfig;
use splashbot::dialogue::AuthState;
use splashbot::token_store::TokenStore;
use splashbot::unsplash::UnsplashClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Splashbot");

    let config = BotConfig::load()?;

    let unsplash =
        UnsplashClient::new(config.unsplash_key.clone(), config.unsplash_secret.clone())?;
    let state = Arc::new(AppState {
        unsplash,
        tokens: TokenStore::new(),
    });

    // Initialize the bot
    let bot = Bot::new(config.bot_key.clone());

    info!("Bot initialized, starting dispatcher");

    // Commands are filtered before the plain-text endpoint, so /search keeps
    // working even while a user is expected to paste an authorization code.
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<AuthState>, AuthState>()
                .branch(
                    dptree::entry()
                        .filter_command::<bot::Command>()
                        .endpoint(bot::command_handler),
                )
                .branch(dptree::endpoint(bot::message_handler)),
        )
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, InMemStorage::<AuthState>::new()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
