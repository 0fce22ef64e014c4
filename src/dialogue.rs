//! Authorization dialogue module for tracking per-user conversation state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Conversation state of the OAuth authorization flow. Stored per chat, so
/// one user pasting a code never affects another user's messages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum AuthState {
    #[default]
    Idle,
    /// The user was sent an authorize link and their next plain message is
    /// expected to be the code Unsplash displayed.
    AwaitingAuthCode,
}

/// Type alias for our authorization dialogue
pub type AuthDialogue = Dialogue<AuthState, InMemStorage<AuthState>>;

/// Validates a pasted authorization code before it is sent to the token
/// endpoint. Only trims and rejects emptiness; the endpoint itself is the
/// authority on what a valid code looks like.
pub fn validate_auth_code(code: &str) -> Result<String, &'static str> {
    let trimmed = code.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_validation() {
        // Valid codes
        assert!(validate_auth_code("abc123").is_ok());
        assert!(validate_auth_code("  xK9-fQ2_z  ").is_ok());

        // Invalid codes
        assert!(validate_auth_code("").is_err());
        assert!(validate_auth_code("   ").is_err());
    }

    #[test]
    fn test_auth_code_trimming() {
        let result = validate_auth_code("  abc123  ");
        assert_eq!(result.unwrap(), "abc123");
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(AuthState::default(), AuthState::Idle);
    }
}
