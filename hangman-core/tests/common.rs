#![allow(dead_code)]

use hangman_core::Room;
use hangman_types::{PlayerId, RoomPhase};
use uuid::Uuid;

/// A room plus the ids of everyone in it, master first.
pub struct TestRoom {
    pub room: Room,
    pub master: PlayerId,
    pub guessers: Vec<PlayerId>,
}

/// Creates a room whose master is "Master" followed by the named guessers
pub fn create_test_room(guesser_names: &[&str]) -> TestRoom {
    let master = Uuid::new_v4();
    let mut room = Room::new(Uuid::new_v4(), master, "Master");
    let guessers = guesser_names
        .iter()
        .map(|name| {
            let id = Uuid::new_v4();
            room.add_player(id, *name, 0);
            id
        })
        .collect();

    TestRoom {
        room,
        master,
        guessers,
    }
}

/// Creates a room with one guesser and the given word already set
pub fn create_room_with_word(word: &str) -> TestRoom {
    let mut test_room = create_test_room(&["Guesser"]);
    test_room.room.set_word(word).unwrap();
    test_room.room.update_next_turn().unwrap();
    test_room
}

/// Guess letters in order, each by whoever holds the turn, advancing the turn
/// after every guess that does not complete the word. Letters left over once
/// the word is complete are ignored.
pub fn guess_in_turn(room: &mut Room, letters: &str) {
    for letter in letters.chars() {
        if room.phase() == RoomPhase::Finished {
            break;
        }
        let player = room.current_turn();
        room.add_guess(player, letter).unwrap();
        if room.phase() == RoomPhase::InProgress {
            room.update_next_turn().unwrap();
        }
    }
}

/// Asserts the single-master invariant
pub fn assert_single_master(room: &Room) {
    let masters: Vec<_> = room
        .summary()
        .players
        .into_iter()
        .filter(|p| p.is_master)
        .collect();
    assert_eq!(masters.len(), 1, "Expected exactly one master, got {:?}", masters);
    assert_eq!(masters[0].id, room.master_id());
}
