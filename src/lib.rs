//! # Splashbot
//!
//! A Telegram bot that searches Unsplash photos and lets users like or
//! unlike them from inline buttons, once they have connected their account
//! through the OAuth code flow.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod token_store;
pub mod unsplash;
