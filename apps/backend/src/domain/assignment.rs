//! One-shot role and word assignment run when a game starts.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::types::{GameMode, PlayerId, Role};
use crate::domain::words::WordCorpus;

/// Result of an assignment. `roles` and `words` are total over the players
/// it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Uniform random permutation of the players; also the speaking order.
    pub turn_order: Vec<PlayerId>,
    pub special_player: PlayerId,
    pub roles: HashMap<PlayerId, Role>,
    pub words: HashMap<PlayerId, Option<String>>,
    /// The word shared by every non-special player.
    pub canonical_word: String,
}

/// Shuffle `players`, pick one holder of the mode's special role, and deal
/// words from one random corpus entry.
///
/// In infiltrator mode the special player gets no word; in spy mode they
/// get a random alternate from the same entry. Returns `None` when
/// `players` is empty.
pub fn assign_roles_and_words<R: Rng + ?Sized>(
    players: &[PlayerId],
    mode: GameMode,
    corpus: &WordCorpus,
    rng: &mut R,
) -> Option<Assignment> {
    if players.is_empty() {
        return None;
    }

    let mut turn_order = players.to_vec();
    turn_order.shuffle(rng);
    let special_player = turn_order[rng.random_range(0..turn_order.len())];

    let entry = corpus.pick_entry(rng);
    let special_word = match mode {
        GameMode::Infiltrator => None,
        GameMode::Spy => Some(entry.pick_alternate(rng).to_string()),
    };

    let mut roles = HashMap::with_capacity(turn_order.len());
    let mut words = HashMap::with_capacity(turn_order.len());
    for &id in &turn_order {
        if id == special_player {
            roles.insert(id, mode.special_role());
            words.insert(id, special_word.clone());
        } else {
            roles.insert(id, mode.base_role());
            words.insert(id, Some(entry.word.clone()));
        }
    }

    Some(Assignment {
        turn_order,
        special_player,
        roles,
        words,
        canonical_word: entry.word.clone(),
    })
}
