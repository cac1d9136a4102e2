use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{FinishState, GuessInfo, PlayerId, PlayerInfo, RoomSummary, WordGuessInfo};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetWordRequest {
    pub word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetWordResponse {
    pub word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterGuessRequest {
    pub letter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordGuessRequest {
    pub word: String,
}

/// Events pushed to every subscriber of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export)]
pub enum RoomEvent {
    RoomRestarted { room: RoomSummary },
    PlayerJoined { player: PlayerInfo },
    PlayerLeft { player: PlayerInfo },
    MasterChanged { player_id: PlayerId },
    WordSet { round: u32, word_length: usize },
    NewGuess { guess: GuessInfo },
    NewTurn { player_id: PlayerId },
    GameFinished { finish: FinishState },
    PlayerUpdated { player: PlayerInfo },
    NewWordGuess { guess: WordGuessInfo },
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::RoomRestarted { .. } => "room_restarted",
            RoomEvent::PlayerJoined { .. } => "player_joined",
            RoomEvent::PlayerLeft { .. } => "player_left",
            RoomEvent::MasterChanged { .. } => "master_changed",
            RoomEvent::WordSet { .. } => "word_set",
            RoomEvent::NewGuess { .. } => "new_guess",
            RoomEvent::NewTurn { .. } => "new_turn",
            RoomEvent::GameFinished { .. } => "game_finished",
            RoomEvent::PlayerUpdated { .. } => "player_updated",
            RoomEvent::NewWordGuess { .. } => "new_word_guess",
        }
    }
}
