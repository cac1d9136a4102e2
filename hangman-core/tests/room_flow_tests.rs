mod common;

use common::*;
use hangman_core::RoomError;
use hangman_types::{FinishReason, RoomPhase};
use pretty_assertions::assert_eq;

#[test]
fn test_cat_scenario() {
    let TestRoom {
        mut room,
        master,
        guessers,
    } = create_test_room(&["G"]);
    let g = guessers[0];

    room.set_word("cat").unwrap();
    assert_eq!(room.update_next_turn().unwrap(), g);

    let guess = room.add_guess(g, 'c').unwrap();
    assert_eq!(guess.positions, vec![0]);
    assert!(room.take_finish_state().is_none());
    // Only one guesser, so the turn wraps back around to them
    assert_eq!(room.update_next_turn().unwrap(), g);
    assert!(!room.is_player_in_turn(master));

    room.add_guess(g, 'a').unwrap();
    room.update_next_turn().unwrap();
    room.add_guess(g, 't').unwrap();

    assert_eq!(room.phase(), RoomPhase::Finished);
    let finish = room.take_finish_state().unwrap();
    assert_eq!(finish.player.id, g);
    assert_eq!(finish.reason, FinishReason::LettersRevealed);
    assert_eq!(finish.player.points, 3);
}

#[test]
fn test_any_guess_order_reaches_finished() {
    let orders = ["elpha", "ahple", "pleah", "lapeh", "zqelaphx"];

    for order in orders {
        let mut test_room = create_test_room(&["Alice", "Bob", "Carol"]);
        test_room.room.restart();
        test_room.room.set_word("Apple").unwrap();
        test_room.room.update_next_turn().unwrap();

        guess_in_turn(&mut test_room.room, order);

        assert_eq!(test_room.room.phase(), RoomPhase::Finished, "order {}", order);
        assert!(test_room.room.take_finish_state().is_some());
        assert!(test_room.room.take_finish_state().is_none());
        assert_single_master(&test_room.room);
    }
}

#[test]
fn test_master_never_receives_turn_while_guessers_remain() {
    let mut test_room = create_test_room(&["Alice", "Bob", "Carol"]);
    let master = test_room.master;
    test_room.room.set_word("abcdefghij").unwrap();

    for _ in 0..12 {
        let next = test_room.room.update_next_turn().unwrap();
        assert_ne!(next, master);
    }
}

#[test]
fn test_finish_state_resets_with_next_word() {
    let mut test_room = create_room_with_word("hi");
    guess_in_turn(&mut test_room.room, "hi");
    assert!(test_room.room.take_finish_state().is_some());

    test_room.room.restart();
    assert!(test_room.room.take_finish_state().is_none());

    // The single guesser became master; the old master now guesses
    assert_single_master(&test_room.room);
    assert_eq!(test_room.room.master_id(), test_room.guessers[0]);
    test_room.room.set_word("ok").unwrap();
    test_room.room.update_next_turn().unwrap();
    assert!(test_room.room.is_player_in_turn(test_room.master));

    guess_in_turn(&mut test_room.room, "ko");
    let finish = test_room.room.take_finish_state().unwrap();
    assert_eq!(finish.player.id, test_room.master);
    assert_eq!(finish.word, "ok");
}

#[test]
fn test_single_master_through_departures() {
    let mut test_room = create_test_room(&["Alice", "Bob"]);
    assert_single_master(&test_room.room);

    test_room.room.set_word("cat").unwrap();
    test_room.room.update_next_turn().unwrap();

    test_room.room.remove_player(test_room.master).unwrap();
    assert_single_master(&test_room.room);
    assert_eq!(test_room.room.master_id(), test_room.guessers[0]);
    // The promoted master held the turn, so it moved on to Bob
    assert!(test_room.room.is_player_in_turn(test_room.guessers[1]));

    let departure = test_room.room.remove_player(test_room.guessers[1]).unwrap();
    assert!(departure.word_abandoned);
    assert_single_master(&test_room.room);
    assert_eq!(test_room.room.phase(), RoomPhase::AwaitingWord);
}

#[test]
fn test_guessed_letter_cannot_be_guessed_again() {
    let mut test_room = create_room_with_word("moon");
    let g = test_room.guessers[0];

    test_room.room.add_guess(g, 'o').unwrap();
    let err = test_room.room.add_guess(g, 'O').unwrap_err();
    assert_eq!(err, RoomError::DuplicateGuess { letter: 'o' });

    // A miss counts as tried too
    test_room.room.add_guess(g, 'x').unwrap();
    assert!(test_room.room.check_guess_is_present('x'));
    assert!(test_room.room.add_guess(g, 'x').is_err());
}
