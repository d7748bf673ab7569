//! Hint collaborator - advisory speaking hints for players.
//!
//! This module provides:
//! - `HintProvider` trait for hint backends
//! - `OpenAiHintProvider`: chat-completions backend over HTTP
//! - `HintService`: timeout and fallback wrapper used by the transport

pub mod hint_service;
pub mod openai;
mod trait_def;

pub use hint_service::{fallback_hint, HintService, NO_WORD_HINT};
pub use openai::OpenAiHintProvider;
pub use trait_def::{HintError, HintProvider};
