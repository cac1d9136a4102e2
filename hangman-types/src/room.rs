use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::player::PlayerInfo;
use crate::{PlayerId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomPhase {
    AwaitingWord, // Master has to pick a word
    InProgress,   // Guessers are taking turns
    Finished,     // Every letter revealed, waiting for a restart
}

/// Snapshot of a room that is safe to hand to any client: letters that have
/// not been revealed yet are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomSummary {
    pub id: RoomId,
    pub round: u32,
    pub phase: RoomPhase,
    pub players: Vec<PlayerInfo>,
    pub master_id: PlayerId,
    pub current_turn: PlayerId,
    pub word: Vec<Option<char>>,
    pub guessed_letters: Vec<char>,
    pub created_at: String, // ISO 8601 string
}

impl RoomSummary {
    pub fn master(&self) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.is_master)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessInfo {
    pub player_id: PlayerId,
    pub letter: char,
    pub hit: bool,
    pub positions: Vec<usize>,
    pub points_awarded: u32,
    pub player_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordGuessInfo {
    pub player_id: PlayerId,
    pub word: String,
    pub correct: bool,
    pub points_awarded: u32,
    /// Letters uncovered by a correct guess, in word order. Empty when wrong.
    pub revealed: Vec<GuessInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FinishReason {
    LettersRevealed,
    WordGuessed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinishState {
    pub player: PlayerInfo,
    pub reason: FinishReason,
    pub word: String,
}
