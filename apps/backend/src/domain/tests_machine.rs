//! Scenario tests for the game state machine.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::machine::{
    cast_vote, end_speaking_turn, remove_player, start_game, tally_votes, RoundOutcome,
    TurnAdvance, VoteOutcome,
};
use crate::domain::room::Room;
use crate::domain::test_gens::{lobby, started, T0};
use crate::domain::types::{GameMode, GameState, PlayerId, Role, Winner};
use crate::domain::words::WordCorpus;
use crate::errors::GameError;

/// Ends every speaking turn until voting opens.
fn run_speaking_round(room: &mut Room) {
    while room.speaking_phase {
        let speaker = room.current_speaker_id.unwrap();
        end_speaking_turn(room, speaker, T0).unwrap();
    }
    assert!(room.voting_phase);
}

fn special_player(room: &Room) -> PlayerId {
    *room
        .roles
        .iter()
        .find(|(_, role)| role.is_special())
        .map(|(id, _)| id)
        .unwrap()
}

fn base_players(room: &Room) -> Vec<PlayerId> {
    room.turn_order
        .iter()
        .copied()
        .filter(|id| !room.roles[id].is_special() && room.is_active(*id))
        .collect()
}

#[test]
fn start_game_scenario_infiltrator() {
    let room = started(3, GameMode::Infiltrator, 11);

    assert_eq!(room.game_state, GameState::Playing);
    assert_eq!(room.current_round, 1);
    assert!(room.speaking_phase && !room.voting_phase);
    assert_eq!(room.current_speaker_id, Some(room.turn_order[0]));
    assert_eq!(room.speaking_turn_started_at, Some(T0));

    let specials: Vec<_> = room.roles.values().filter(|r| r.is_special()).collect();
    assert_eq!(specials, vec![&Role::Infiltrator]);

    let infiltrator = special_player(&room);
    assert_eq!(room.words[&infiltrator], None);
    let shared: Vec<_> = base_players(&room)
        .iter()
        .map(|id| room.words[id].clone())
        .collect();
    assert_eq!(shared.len(), 2);
    assert!(shared[0].is_some());
    assert_eq!(shared[0], shared[1]);
}

#[test]
fn start_game_rejections_leave_room_untouched() {
    let corpus = WordCorpus::embedded().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let mut room = lobby(3);
    let before = room.clone();
    let guest = room.players[1].id;
    assert_eq!(
        start_game(&mut room, guest, GameMode::Spy, &corpus, &mut rng, T0),
        Err(GameError::NotHost)
    );
    assert_eq!(room, before);

    let mut small = lobby(2);
    let before = small.clone();
    let host = small.host_id;
    assert_eq!(
        start_game(&mut small, host, GameMode::Spy, &corpus, &mut rng, T0),
        Err(GameError::InsufficientPlayers)
    );
    assert_eq!(small, before);

    let mut playing = started(4, GameMode::Spy, 2);
    let before = playing.clone();
    let host = playing.host_id;
    assert_eq!(
        start_game(&mut playing, host, GameMode::Spy, &corpus, &mut rng, T0),
        Err(GameError::InvalidState)
    );
    assert_eq!(playing, before);
}

#[test]
fn only_current_speaker_can_end_turn() {
    let mut room = started(4, GameMode::Spy, 3);
    let speaker = room.current_speaker_id.unwrap();
    let other = room.turn_order[1];
    let before = room.clone();

    assert_eq!(
        end_speaking_turn(&mut room, other, T0),
        Err(GameError::NotYourTurn)
    );
    assert_eq!(room, before);

    let advance = end_speaking_turn(&mut room, speaker, T0 + 5_000).unwrap();
    assert_eq!(advance, TurnAdvance::NextSpeaker(other));
    assert_eq!(room.speaking_turn_started_at, Some(T0 + 5_000));
}

#[test]
fn speaking_round_visits_each_player_once_then_opens_voting() {
    let mut room = started(5, GameMode::Infiltrator, 4);
    let mut spoken = Vec::new();
    loop {
        let speaker = room.current_speaker_id.unwrap();
        spoken.push(speaker);
        match end_speaking_turn(&mut room, speaker, T0).unwrap() {
            TurnAdvance::NextSpeaker(_) => continue,
            TurnAdvance::VotingOpened => break,
        }
    }
    assert_eq!(spoken, room.turn_order);
    assert!(room.voting_phase && !room.speaking_phase);
    assert!(room.votes.is_empty());
    assert_eq!(room.current_speaker_id, None);

    assert_eq!(
        end_speaking_turn(&mut room, spoken[0], T0),
        Err(GameError::InvalidState)
    );
}

#[test]
fn vote_outside_voting_phase_is_rejected() {
    let mut room = started(3, GameMode::Spy, 5);
    let (a, b) = (room.turn_order[0], room.turn_order[1]);
    assert_eq!(cast_vote(&mut room, a, b, T0), Err(GameError::InvalidState));
}

#[test]
fn self_votes_and_votes_for_outsiders_are_rejected() {
    let mut room = started(4, GameMode::Spy, 6);
    run_speaking_round(&mut room);
    let a = room.turn_order[0];

    assert_eq!(
        cast_vote(&mut room, a, a, T0),
        Err(GameError::InvalidVoteTarget)
    );
    assert_eq!(
        cast_vote(&mut room, a, uuid::Uuid::new_v4(), T0),
        Err(GameError::InvalidVoteTarget)
    );
    assert_eq!(
        cast_vote(&mut room, uuid::Uuid::new_v4(), a, T0),
        Err(GameError::IneligibleVoter)
    );
    assert!(room.votes.is_empty());
}

#[test]
fn last_vote_overwrites_and_resolution_waits_for_everyone() {
    let mut room = started(4, GameMode::Spy, 7);
    run_speaking_round(&mut room);
    let order = room.turn_order.clone();

    let outcome = cast_vote(&mut room, order[0], order[1], T0).unwrap();
    assert_eq!(
        outcome,
        VoteOutcome::Recorded {
            votes_cast: 1,
            votes_needed: 4
        }
    );
    cast_vote(&mut room, order[0], order[2], T0).unwrap();
    assert_eq!(room.votes.len(), 1);
    assert_eq!(room.votes[&order[0]], order[2]);

    cast_vote(&mut room, order[1], order[2], T0).unwrap();
    cast_vote(&mut room, order[2], order[1], T0).unwrap();
    assert!(room.voting_phase);
    assert!(room.eliminated.is_empty());
}

#[test]
fn majority_scenario_eliminates_the_most_voted() {
    // A->B, B->C, C->B eliminates B.
    let mut room = started(3, GameMode::Infiltrator, 8);
    run_speaking_round(&mut room);
    let (a, b, c) = (room.players[0].id, room.players[1].id, room.players[2].id);

    cast_vote(&mut room, a, b, T0).unwrap();
    cast_vote(&mut room, b, c, T0).unwrap();
    let VoteOutcome::Resolved(elim) = cast_vote(&mut room, c, b, T0).unwrap() else {
        panic!("vote should resolve once everyone voted");
    };

    assert_eq!(elim.eliminated_id, b);
    assert_eq!(elim.eliminated_name, "P1");
    assert_eq!(elim.votes_received, 2);
    assert_eq!(room.eliminated, vec![b]);
    assert!(room.votes.is_empty());
    assert!(!room.voting_phase);
}

#[test]
fn eliminating_the_special_role_ends_the_game() {
    for (mode, winner) in [
        (GameMode::Infiltrator, Winner::Citizens),
        (GameMode::Spy, Winner::Agents),
    ] {
        let mut room = started(5, mode, 9);
        run_speaking_round(&mut room);
        let special = special_player(&room);
        for voter in room.turn_order.clone() {
            let target = if voter == special {
                base_players(&room)[0]
            } else {
                special
            };
            cast_vote(&mut room, voter, target, T0).unwrap();
        }

        assert_eq!(room.game_state, GameState::Finished);
        assert_eq!(room.winner, Some(winner));
        assert!(!room.speaking_phase && !room.voting_phase);
    }
}

#[test]
fn special_role_wins_when_two_remain() {
    let mut room = started(3, GameMode::Spy, 10);
    run_speaking_round(&mut room);
    let special = special_player(&room);
    let victim = base_players(&room)[0];

    let mut last = None;
    for voter in room.turn_order.clone() {
        let target = if voter == victim { special } else { victim };
        last = Some(cast_vote(&mut room, voter, target, T0).unwrap());
    }

    let Some(VoteOutcome::Resolved(elim)) = last else {
        panic!("expected resolution");
    };
    assert!(!elim.was_special_role);
    assert_eq!(
        elim.outcome,
        RoundOutcome::GameOver {
            winner: Winner::Spy
        }
    );
    assert_eq!(room.game_state, GameState::Finished);
}

#[test]
fn continuing_round_skips_the_eliminated() {
    let mut room = started(5, GameMode::Infiltrator, 12);
    run_speaking_round(&mut room);
    let victim = base_players(&room)[0];
    let fallback = base_players(&room)[1];

    for voter in room.turn_order.clone() {
        let target = if voter == victim { fallback } else { victim };
        cast_vote(&mut room, voter, target, T0 + 1).unwrap();
    }

    assert_eq!(room.current_round, 2);
    assert!(room.speaking_phase);
    let first_active = room
        .turn_order
        .iter()
        .copied()
        .find(|id| *id != victim)
        .unwrap();
    assert_eq!(room.current_speaker_id, Some(first_active));
    assert_eq!(room.speaking_turn_started_at, Some(T0 + 1));

    let mut spoken = Vec::new();
    while room.speaking_phase {
        let speaker = room.current_speaker_id.unwrap();
        spoken.push(speaker);
        end_speaking_turn(&mut room, speaker, T0).unwrap();
    }
    assert_eq!(spoken.len(), 4);
    assert!(!spoken.contains(&victim));

    // Eliminated players can no longer vote.
    assert_eq!(
        cast_vote(&mut room, victim, first_active, T0),
        Err(GameError::IneligibleVoter)
    );
}

#[test]
fn ties_go_to_the_earliest_in_turn_order() {
    let order: Vec<PlayerId> = (0..4).map(|_| uuid::Uuid::new_v4()).collect();
    let votes = HashMap::from([
        (order[0], order[3]),
        (order[3], order[1]),
        (order[1], order[0]),
        (order[2], order[2]),
    ]);
    // Every target has one vote; order[0] is first in turn order.
    assert_eq!(tally_votes(&votes, &order), Some((order[0], 1)));

    let votes = HashMap::from([
        (order[0], order[3]),
        (order[1], order[3]),
        (order[2], order[1]),
        (order[3], order[1]),
    ]);
    assert_eq!(tally_votes(&votes, &order), Some((order[1], 2)));
    assert_eq!(tally_votes(&HashMap::new(), &order), None);
}

#[test]
fn host_leaving_lobby_reassigns_to_first_remaining() {
    let mut room = lobby(3);
    let (host, second) = (room.players[0].id, room.players[1].id);

    let departure = remove_player(&mut room, host, T0);

    assert!(!departure.room_empty);
    assert_eq!(departure.new_host, Some(second));
    assert_eq!(room.host_id, second);
    assert_eq!(room.players.len(), 2);
}

#[test]
fn last_player_leaving_empties_the_room() {
    let mut room = lobby(1);
    let only = room.players[0].id;
    let departure = remove_player(&mut room, only, T0);
    assert!(departure.room_empty);
    assert!(room.players.is_empty());
}

#[test]
fn removing_a_stranger_changes_nothing() {
    let mut room = lobby(3);
    let before = room.clone();
    let departure = remove_player(&mut room, uuid::Uuid::new_v4(), T0);
    assert_eq!(departure, Default::default());
    assert_eq!(room, before);
}

#[test]
fn departing_speaker_passes_the_turn() {
    let mut room = started(4, GameMode::Spy, 13);
    let speaker = room.current_speaker_id.unwrap();
    let next = room.turn_order[1];

    let departure = remove_player(&mut room, speaker, T0 + 10);

    assert_eq!(departure.turn, Some(TurnAdvance::NextSpeaker(next)));
    assert_eq!(room.current_speaker_id, Some(next));
    assert_eq!(room.game_state, GameState::Playing);
    assert!(room.roles.contains_key(&speaker));
}

#[test]
fn departure_completing_the_ballot_resolves_the_vote() {
    let mut room = started(5, GameMode::Infiltrator, 14);
    run_speaking_round(&mut room);
    let special = special_player(&room);
    let bases = base_players(&room);
    let (leaver, victim) = (bases[0], bases[1]);

    for voter in room.turn_order.clone() {
        if voter == leaver {
            continue;
        }
        let target = if voter == victim { bases[2] } else { victim };
        cast_vote(&mut room, voter, target, T0).unwrap();
    }
    assert!(room.voting_phase);

    let departure = remove_player(&mut room, leaver, T0);
    let elim = departure.elimination.expect("vote resolves");
    assert_eq!(elim.eliminated_id, victim);
    assert!(!elim.was_special_role);
    assert_eq!(elim.outcome, RoundOutcome::Continued { round: 2 });
    assert!(room.is_active(special));
}

#[test]
fn departure_discards_ballots_naming_the_leaver() {
    let mut room = started(5, GameMode::Spy, 15);
    run_speaking_round(&mut room);
    let order = room.turn_order.clone();

    cast_vote(&mut room, order[0], order[4], T0).unwrap();
    cast_vote(&mut room, order[4], order[0], T0).unwrap();
    cast_vote(&mut room, order[1], order[2], T0).unwrap();

    remove_player(&mut room, order[4], T0);

    assert_eq!(room.votes.len(), 1);
    assert_eq!(room.votes[&order[1]], order[2]);
}

#[test]
fn lone_survivor_closes_the_round_and_settles_the_game() {
    let mut room = started(4, GameMode::Infiltrator, 16);
    let order = room.turn_order.clone();
    let lone = order[0];
    for leaver in &order[1..] {
        let departure = remove_player(&mut room, *leaver, T0);
        assert_eq!(departure.game_over, None);
    }
    assert_eq!(room.active_players(), vec![lone]);
    assert!(room.speaking_phase);
    assert_eq!(room.current_speaker_id, Some(lone));

    // The rotation with a single active player still terminates.
    assert_eq!(
        end_speaking_turn(&mut room, lone, T0),
        Ok(TurnAdvance::VotingOpened)
    );
    assert!(room.voting_phase && !room.speaking_phase);

    // The only ballot left is a vote for themselves.
    let outcome = cast_vote(&mut room, lone, lone, T0).unwrap();
    let VoteOutcome::Resolved(elim) = outcome else {
        panic!("a single ballot resolves the vote");
    };
    assert_eq!(elim.eliminated_id, lone);
    assert_eq!(room.game_state, GameState::Finished);
    assert!(!room.speaking_phase && !room.voting_phase);
    let expected = if room.roles[&lone].is_special() {
        Winner::Citizens
    } else {
        Winner::Infiltrator
    };
    assert_eq!(room.winner, Some(expected));
    assert_eq!(elim.outcome, RoundOutcome::GameOver { winner: expected });
}

#[test]
fn self_vote_needs_a_lone_survivor() {
    let mut room = started(4, GameMode::Spy, 17);
    let order = room.turn_order.clone();
    remove_player(&mut room, order[3], T0);
    remove_player(&mut room, order[2], T0);
    run_speaking_round(&mut room);

    assert_eq!(room.active_count(), 2);
    assert_eq!(
        cast_vote(&mut room, order[0], order[0], T0),
        Err(GameError::InvalidVoteTarget)
    );
    assert!(room.votes.is_empty());
}

#[test]
fn room_with_only_eliminated_players_finishes() {
    let mut room = started(5, GameMode::Spy, 18);
    run_speaking_round(&mut room);
    let special = special_player(&room);
    let bases = base_players(&room);
    let victim = bases[0];
    for voter in room.turn_order.clone() {
        let target = if voter == victim { bases[1] } else { victim };
        cast_vote(&mut room, voter, target, T0).unwrap();
    }
    assert!(room.is_eliminated(victim));
    assert_eq!(room.game_state, GameState::Playing);

    let survivors = room.active_players();
    let (last, rest) = survivors.split_last().unwrap();
    for leaver in rest {
        assert_eq!(remove_player(&mut room, *leaver, T0).game_over, None);
    }
    let departure = remove_player(&mut room, *last, T0);

    assert_eq!(departure.game_over, Some(Winner::Spy));
    assert_eq!(room.game_state, GameState::Finished);
    assert_eq!(room.winner, Some(Winner::Spy));
    assert!(!room.speaking_phase && !room.voting_phase);
    assert_eq!(room.players.len(), 1);
    assert!(room.roles.contains_key(&special));
}
