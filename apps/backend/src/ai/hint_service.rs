//! Best-effort hint lookup with timeout and fixed fallbacks.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::{HintError, HintProvider};
use crate::domain::Role;

pub const NO_WORD_HINT: &str =
    "You have no word. Blend in and try to figure out what others are describing.";

pub fn fallback_hint(word: &str) -> String {
    format!("Describe \"{word}\" without saying it directly.")
}

#[derive(Clone)]
pub struct HintService {
    provider: Option<Arc<dyn HintProvider>>,
    timeout: Duration,
}

impl HintService {
    pub fn new(provider: Option<Arc<dyn HintProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// A service that always answers with the fallback.
    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// A hint for `word`. Never fails: provider errors and timeouts yield
    /// the fallback, and a missing word yields the blend-in hint without
    /// asking the provider.
    pub async fn hint_for(&self, word: Option<&str>, role: Role) -> String {
        let Some(word) = word else {
            return NO_WORD_HINT.to_string();
        };
        match self.try_provider(word, role).await {
            Ok(hint) => hint,
            Err(HintError::Disabled) => fallback_hint(word),
            Err(err) => {
                warn!(error = %err, role = role.as_str(), "hint provider failed; using fallback");
                fallback_hint(word)
            }
        }
    }

    async fn try_provider(&self, word: &str, role: Role) -> Result<String, HintError> {
        let provider = self.provider.as_ref().ok_or(HintError::Disabled)?;
        let hint = tokio::time::timeout(self.timeout, provider.generate_hint(word, role))
            .await
            .map_err(|_| HintError::Timeout)??;
        debug!(role = role.as_str(), "hint generated");
        Ok(hint)
    }
}
