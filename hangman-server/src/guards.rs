use hangman_core::{Room, RoomError};
use hangman_types::PlayerId;

/// Who may attempt to guess the whole word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordGuessPolicy {
    #[default]
    AnyPlayer,
    TurnHolderOnly,
}

pub fn ensure_member(room: &Room, caller: PlayerId) -> Result<(), RoomError> {
    if room.contains_player(caller) {
        Ok(())
    } else {
        Err(RoomError::PlayerNotFound { player_id: caller })
    }
}

pub fn ensure_turn_holder(room: &Room, caller: PlayerId) -> Result<(), RoomError> {
    ensure_member(room, caller)?;
    if !room.is_player_in_turn(caller) {
        return Err(RoomError::NotTurnHolder);
    }
    Ok(())
}

pub fn ensure_master(room: &Room, caller: PlayerId) -> Result<(), RoomError> {
    ensure_member(room, caller)?;
    if !room.is_master(caller) {
        return Err(RoomError::NotMaster);
    }
    Ok(())
}

/// Players leave on their own behalf only.
pub fn ensure_self(caller: PlayerId, player_id: PlayerId) -> Result<(), RoomError> {
    if caller != player_id {
        return Err(RoomError::NotSelf);
    }
    Ok(())
}

pub fn ensure_word_guess_allowed(
    room: &Room,
    caller: PlayerId,
    policy: WordGuessPolicy,
) -> Result<(), RoomError> {
    match policy {
        WordGuessPolicy::AnyPlayer => ensure_member(room, caller),
        WordGuessPolicy::TurnHolderOnly => ensure_turn_holder(room, caller),
    }
}
