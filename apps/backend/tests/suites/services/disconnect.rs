use party_backend::domain::{GameMode, GameState};
use uuid::Uuid;

use super::lobby_flow::flow;

#[test]
fn host_disconnect_reassigns_and_notifies_remaining() {
    let (flow, rec) = flow();
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let code = flow.create_room(host, "Ana").unwrap().code;
    flow.join_room(guest, &code, "Bo").unwrap();
    rec.clear();

    flow.disconnect(host);

    assert!(rec.inbox(host).is_empty());
    let update = &rec.inbox(guest)[0];
    assert_eq!(update["type"], "roomUpdate");
    assert_eq!(update["hostId"], guest.to_string());
    assert_eq!(update["players"].as_array().unwrap().len(), 1);
}

#[test]
fn last_disconnect_deletes_room_silently() {
    let (flow, rec) = flow();
    let host = Uuid::new_v4();
    let code = flow.create_room(host, "Ana").unwrap().code;
    rec.clear();

    flow.disconnect(host);

    assert_eq!(rec.total_sent(), 0);
    assert!(flow.registry().room(&code).is_none());
    assert_eq!(flow.registry().room_count(), 0);

    // Disconnecting twice, or a stranger, is harmless.
    flow.disconnect(host);
    flow.disconnect(Uuid::new_v4());
    assert_eq!(rec.total_sent(), 0);
}

#[test]
fn mid_game_departure_keeps_the_game_running() {
    let (flow, rec) = flow();
    let ids: Vec<_> = (0..4).map(|_| Uuid::new_v4()).collect();
    let code = flow.create_room(ids[0], "P0").unwrap().code;
    for (i, id) in ids.iter().enumerate().skip(1) {
        flow.join_room(*id, &code, &format!("P{i}")).unwrap();
    }
    let room = flow.start_game(ids[0], &code, GameMode::Spy).unwrap();
    let speaker = room.current_speaker_id.unwrap();
    rec.clear();

    flow.disconnect(speaker);

    let room = flow.registry().room(&code).unwrap();
    assert_eq!(room.game_state, GameState::Playing);
    assert_eq!(room.players.len(), 3);
    assert_ne!(room.current_speaker_id, Some(speaker));
    assert!(room.is_member(room.host_id));
    for id in ids.iter().filter(|id| **id != speaker) {
        assert_eq!(rec.inbox_types(*id), vec!["roomUpdate"]);
    }
}
