// Fixtures and proptest generators for room scenarios.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::domain::machine::start_game;
use crate::domain::room::Room;
use crate::domain::types::{GameMode, Participant, ROOM_CAPACITY};
use crate::domain::words::WordCorpus;

pub const T0: i64 = 1_700_000_000_000;

pub fn participant(name: &str) -> Participant {
    Participant {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
    }
}

/// Lobby with `n` players named P0..Pn; P0 hosts.
pub fn lobby(n: usize) -> Room {
    let mut players = (0..n).map(|i| participant(&format!("P{i}")));
    let host = players.next().unwrap_or_else(|| participant("P0"));
    let mut room = Room::new("TEST01".to_string(), host);
    room.players.extend(players);
    room
}

/// A started game with `n` players, seeded.
pub fn started(n: usize, mode: GameMode, seed: u64) -> Room {
    let mut room = lobby(n);
    let corpus = WordCorpus::embedded().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let host = room.host_id;
    start_game(&mut room, host, mode, &corpus, &mut rng, T0).unwrap();
    room
}

pub fn game_mode() -> impl Strategy<Value = GameMode> {
    prop_oneof![Just(GameMode::Infiltrator), Just(GameMode::Spy)]
}

/// Player counts that can start a game.
pub fn player_count() -> impl Strategy<Value = usize> {
    3..=ROOM_CAPACITY
}
