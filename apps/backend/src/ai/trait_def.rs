//! Hint provider trait definition.

use std::fmt;

use async_trait::async_trait;

use crate::domain::Role;

/// Errors that can occur while fetching a hint.
#[derive(Debug)]
pub enum HintError {
    /// Provider did not answer within the configured timeout
    Timeout,
    /// No provider is configured
    Disabled,
    /// Request could not be sent or the provider answered with an error status
    Transport(String),
    /// Provider answered with something that holds no usable hint
    BadResponse(String),
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintError::Timeout => write!(f, "hint request timed out"),
            HintError::Disabled => write!(f, "hint provider disabled"),
            HintError::Transport(msg) => write!(f, "hint transport error: {msg}"),
            HintError::BadResponse(msg) => write!(f, "hint provider bad response: {msg}"),
        }
    }
}

impl std::error::Error for HintError {}

/// Source of one-sentence speaking hints.
///
/// Implementations are best-effort; callers never let a failure reach the
/// game.
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn generate_hint(&self, word: &str, role: Role) -> Result<String, HintError>;
}
