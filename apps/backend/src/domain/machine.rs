//! Game state machine: lobby -> playing (speaking <-> voting) -> finished.
//!
//! Every function here either fails without touching the room or applies
//! the whole transition. Callers own the locking.

use std::collections::HashMap;

use rand::Rng;
use time::OffsetDateTime;

use crate::domain::assignment::assign_roles_and_words;
use crate::domain::room::Room;
use crate::domain::types::{GameMode, GameState, PlayerId, Winner, MIN_PLAYERS};
use crate::domain::words::WordCorpus;
use crate::errors::GameError;

/// What happened to the speaking rotation after a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    NextSpeaker(PlayerId),
    VotingOpened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A new speaking round began.
    Continued { round: u32 },
    GameOver { winner: Winner },
}

/// A resolved vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub eliminated_id: PlayerId,
    pub eliminated_name: String,
    pub was_special_role: bool,
    pub votes_received: usize,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded {
        votes_cast: usize,
        votes_needed: usize,
    },
    Resolved(Elimination),
}

/// Side effects of a participant leaving a room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Departure {
    pub room_empty: bool,
    pub new_host: Option<PlayerId>,
    /// The departed player was speaking; the turn moved on.
    pub turn: Option<TurnAdvance>,
    /// The departure completed a pending vote.
    pub elimination: Option<Elimination>,
    /// Nobody active is left; the special role was never caught.
    pub game_over: Option<Winner>,
}

/// Current wall clock as unix milliseconds.
pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

/// Start the game in `mode`.
///
/// Checks, in order: requester is host, room is in the lobby, enough
/// players. On success roles and words are assigned, the turn order is
/// fixed and the first speaker's turn begins.
pub fn start_game<R: Rng + ?Sized>(
    room: &mut Room,
    requester: PlayerId,
    mode: GameMode,
    corpus: &WordCorpus,
    rng: &mut R,
    now_ms: i64,
) -> Result<(), GameError> {
    if requester != room.host_id {
        return Err(GameError::NotHost);
    }
    if room.game_state != GameState::Lobby {
        return Err(GameError::InvalidState);
    }
    if room.players.len() < MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers);
    }

    let ids: Vec<PlayerId> = room.players.iter().map(|p| p.id).collect();
    let assignment =
        assign_roles_and_words(&ids, mode, corpus, rng).ok_or(GameError::InsufficientPlayers)?;

    room.game_mode = Some(mode);
    room.game_state = GameState::Playing;
    room.current_round = 1;
    room.turn_order = assignment.turn_order;
    room.roles = assignment.roles;
    room.words = assignment.words;
    room.votes.clear();
    room.eliminated.clear();
    room.winner = None;
    begin_speaking_round(room, now_ms);
    Ok(())
}

/// End the current speaker's turn.
pub fn end_speaking_turn(
    room: &mut Room,
    requester: PlayerId,
    now_ms: i64,
) -> Result<TurnAdvance, GameError> {
    if room.game_state != GameState::Playing || !room.speaking_phase {
        return Err(GameError::InvalidState);
    }
    if room.current_speaker_id != Some(requester) {
        return Err(GameError::NotYourTurn);
    }
    Ok(advance_speaker(room, now_ms))
}

/// Record `voter`'s ballot, resolving the vote once every active player
/// has voted.
pub fn cast_vote(
    room: &mut Room,
    voter: PlayerId,
    target: PlayerId,
    now_ms: i64,
) -> Result<VoteOutcome, GameError> {
    if room.game_state != GameState::Playing || !room.voting_phase {
        return Err(GameError::InvalidState);
    }
    if !room.is_active(voter) {
        return Err(GameError::IneligibleVoter);
    }
    // A lone survivor can only vote for themselves.
    let sole_survivor = room.active_count() == 1;
    if !room.is_active(target) || (target == voter && !sole_survivor) {
        return Err(GameError::InvalidVoteTarget);
    }

    room.votes.insert(voter, target);
    Ok(resolve_if_complete(room, now_ms)
        .map(VoteOutcome::Resolved)
        .unwrap_or_else(|| VoteOutcome::Recorded {
            votes_cast: room.votes.len(),
            votes_needed: room.active_count(),
        }))
}

/// Target with the most votes and its count.
///
/// Ties go to the target that appears first in `turn_order`; targets missing
/// from it rank last, ordered by id.
pub fn tally_votes(
    votes: &HashMap<PlayerId, PlayerId>,
    turn_order: &[PlayerId],
) -> Option<(PlayerId, usize)> {
    let mut counts: HashMap<PlayerId, usize> = HashMap::new();
    for target in votes.values() {
        *counts.entry(*target).or_default() += 1;
    }
    let rank = |id: &PlayerId| {
        turn_order
            .iter()
            .position(|p| p == id)
            .unwrap_or(turn_order.len())
    };
    counts.into_iter().max_by(|(a, a_count), (b, b_count)| {
        a_count
            .cmp(b_count)
            .then_with(|| rank(b).cmp(&rank(a)))
            .then_with(|| b.cmp(a))
    })
}

/// Remove `player` from the room.
///
/// The room otherwise stays as it was: the host moves to the first
/// remaining player, the departed player's ballot and any ballots naming
/// them are dropped, a departing speaker passes the turn, and a vote that
/// is now complete resolves. A game left with only eliminated players
/// finishes in the special faction's favor.
pub fn remove_player(room: &mut Room, player: PlayerId, now_ms: i64) -> Departure {
    let Some(index) = room.players.iter().position(|p| p.id == player) else {
        return Departure::default();
    };
    let was_speaker = room.speaking_phase && room.current_speaker_id == Some(player);
    room.players.remove(index);

    if room.players.is_empty() {
        return Departure {
            room_empty: true,
            ..Departure::default()
        };
    }

    let mut departure = Departure::default();
    if room.host_id == player {
        room.host_id = room.players[0].id;
        departure.new_host = Some(room.host_id);
    }

    if room.game_state != GameState::Playing {
        return departure;
    }

    room.votes
        .retain(|voter, target| *voter != player && *target != player);

    if room.active_count() == 0 {
        if let Some(mode) = room.game_mode {
            let winner = mode.special_faction();
            finish(room, winner);
            departure.game_over = Some(winner);
        }
        return departure;
    }

    if was_speaker {
        departure.turn = Some(advance_speaker(room, now_ms));
    }
    if room.voting_phase {
        departure.elimination = resolve_if_complete(room, now_ms);
    }
    departure
}

fn begin_speaking_round(room: &mut Room, now_ms: i64) {
    room.spoken_this_round.clear();
    room.votes.clear();
    room.voting_phase = false;
    room.speaking_phase = true;
    room.current_speaker_id = room
        .turn_order
        .iter()
        .copied()
        .find(|id| room.is_active(*id));
    room.speaking_turn_started_at = Some(now_ms);
    if room.current_speaker_id.is_none() {
        open_voting(room);
    }
}

/// Mark the current speaker as done and hand the turn to the next active
/// player after them in turn order who has not spoken yet. Opens voting
/// when nobody is left.
fn advance_speaker(room: &mut Room, now_ms: i64) -> TurnAdvance {
    let current = room.current_speaker_id;
    if let Some(current) = current {
        if !room.spoken_this_round.contains(&current) {
            room.spoken_this_round.push(current);
        }
    }

    let len = room.turn_order.len();
    let start = current
        .and_then(|c| room.turn_order.iter().position(|id| *id == c))
        .map_or(0, |i| i + 1);
    let next = (0..len)
        .map(|offset| room.turn_order[(start + offset) % len])
        .find(|id| room.is_active(*id) && !room.spoken_this_round.contains(id));

    match next {
        Some(id) => {
            room.current_speaker_id = Some(id);
            room.speaking_turn_started_at = Some(now_ms);
            TurnAdvance::NextSpeaker(id)
        }
        None => {
            open_voting(room);
            TurnAdvance::VotingOpened
        }
    }
}

fn open_voting(room: &mut Room) {
    room.speaking_phase = false;
    room.voting_phase = true;
    room.current_speaker_id = None;
    room.speaking_turn_started_at = None;
    room.votes.clear();
}

fn resolve_if_complete(room: &mut Room, now_ms: i64) -> Option<Elimination> {
    let needed = room.active_count();
    if needed == 0 || room.votes.len() < needed {
        return None;
    }
    let (eliminated_id, votes_received) = tally_votes(&room.votes, &room.turn_order)?;
    let mode = room.game_mode?;

    room.eliminated.push(eliminated_id);
    room.votes.clear();
    room.voting_phase = false;

    let was_special_role = room
        .roles
        .get(&eliminated_id)
        .is_some_and(|role| role.is_special());
    let eliminated_name = room
        .player(eliminated_id)
        .map(|p| p.display_name.clone())
        .unwrap_or_default();

    let outcome = if was_special_role {
        finish(room, mode.base_faction())
    } else if room.active_count() <= 2 {
        finish(room, mode.special_faction())
    } else {
        room.current_round += 1;
        begin_speaking_round(room, now_ms);
        RoundOutcome::Continued {
            round: room.current_round,
        }
    };

    Some(Elimination {
        eliminated_id,
        eliminated_name,
        was_special_role,
        votes_received,
        outcome,
    })
}

fn finish(room: &mut Room, winner: Winner) -> RoundOutcome {
    room.game_state = GameState::Finished;
    room.winner = Some(winner);
    room.speaking_phase = false;
    room.voting_phase = false;
    room.current_speaker_id = None;
    room.speaking_turn_started_at = None;
    RoundOutcome::GameOver { winner }
}
