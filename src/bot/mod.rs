//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles commands and plain-text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats photo messages
//! - `dialogue_manager`: Manages the authorization dialogue transitions

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use crate::token_store::TokenStore;
use crate::unsplash::UnsplashClient;

/// State shared by every handler: the Unsplash client and the per-user
/// access tokens. Lives in an `Arc` injected through the dispatcher.
pub struct AppState {
    pub unsplash: UnsplashClient,
    pub tokens: TokenStore,
}

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, message_handler, Command};

// Re-export utility functions that might be used elsewhere
pub use ui_builder::{create_photo_keyboard, format_photo_message, CallbackAction};
