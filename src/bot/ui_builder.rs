//! UI Builder module for creating keyboards and formatting photo messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::markdown::{escape, link};

use crate::error::BotError;
use crate::unsplash::Photo;

/// Wire tags for the like/unlike buttons. The download button carries the
/// bare photo id with no separator.
pub const LIKE_TRIGGER: &str = "like-trigger";
pub const UNLIKE_TRIGGER: &str = "unlike-trigger";
const SEPARATOR: char = '|';

/// A decoded button press. Payloads look like `like-trigger|p123`,
/// `unlike-trigger|p123` or just `p123` for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Like(String),
    Unlike(String),
    Download(String),
}

impl CallbackAction {
    /// Decodes a callback payload. A payload with a separator but an unknown
    /// action tag, or with an empty photo id, is malformed.
    pub fn parse(data: &str) -> Result<Self, BotError> {
        match data.split_once(SEPARATOR) {
            Some((LIKE_TRIGGER, photo_id)) if !photo_id.is_empty() => {
                Ok(CallbackAction::Like(photo_id.to_string()))
            }
            Some((UNLIKE_TRIGGER, photo_id)) if !photo_id.is_empty() => {
                Ok(CallbackAction::Unlike(photo_id.to_string()))
            }
            Some(_) => Err(BotError::MalformedCallback(data.to_string())),
            None if data.is_empty() => Err(BotError::MalformedCallback(data.to_string())),
            None => Ok(CallbackAction::Download(data.to_string())),
        }
    }

    /// Encodes the action back into its wire payload.
    pub fn as_data(&self) -> String {
        match self {
            CallbackAction::Like(photo_id) => format!("{}{}{}", LIKE_TRIGGER, SEPARATOR, photo_id),
            CallbackAction::Unlike(photo_id) => {
                format!("{}{}{}", UNLIKE_TRIGGER, SEPARATOR, photo_id)
            }
            CallbackAction::Download(photo_id) => photo_id.clone(),
        }
    }

    pub fn photo_id(&self) -> &str {
        match self {
            CallbackAction::Like(photo_id)
            | CallbackAction::Unlike(photo_id)
            | CallbackAction::Download(photo_id) => photo_id,
        }
    }
}

/// Create the action row for one photo: a like or unlike button depending on
/// the current liked state, plus a download button.
pub fn create_photo_keyboard(photo_id: &str, liked: bool) -> InlineKeyboardMarkup {
    let like_button = if liked {
        InlineKeyboardButton::callback(
            "unlike",
            CallbackAction::Unlike(photo_id.to_string()).as_data(),
        )
    } else {
        InlineKeyboardButton::callback(
            "like",
            CallbackAction::Like(photo_id.to_string()).as_data(),
        )
    };
    let download_button = InlineKeyboardButton::callback(
        "download",
        CallbackAction::Download(photo_id.to_string()).as_data(),
    );

    InlineKeyboardMarkup::new(vec![vec![like_button, download_button]])
}

/// Format one photo as a MarkdownV2 message: the description (or the query
/// when the photo has none) linked over the image, the author linked to
/// their profile, and the like count.
pub fn format_photo_message(photo: &Photo, query: &str) -> String {
    let title = photo
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(query);

    format!(
        "{}\n📷 {}\n❤️ {}",
        link(&photo.urls.regular, &escape(title)),
        link(&photo.user.links.html, &escape(&photo.user.name)),
        photo.likes
    )
}
