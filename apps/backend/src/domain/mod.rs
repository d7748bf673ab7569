//! Domain layer: pure game logic types and transitions.

pub mod assignment;
pub mod machine;
pub mod room;
pub mod types;
pub mod words;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_machine;

// Re-exports for ergonomics
pub use assignment::{assign_roles_and_words, Assignment};
pub use machine::{Departure, Elimination, RoundOutcome, TurnAdvance, VoteOutcome};
pub use room::Room;
pub use types::{GameMode, GameState, Participant, PlayerId, Role, Winner};
pub use words::{CorpusError, WordCorpus};
