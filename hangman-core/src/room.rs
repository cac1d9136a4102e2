use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use hangman_types::{
    FinishReason, FinishState, GuessInfo, PlayerId, PlayerInfo, RoomId, RoomPhase, RoomSummary,
    WordGuessInfo,
};
use tracing::debug;

use crate::RoomError;
use crate::word_validation::{fold_letter, normalize_word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterSlot {
    pub letter: char,
    pub guessed: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub points: u32,
    pub joined_at: String, // ISO 8601 string
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            points,
            joined_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Outcome of removing a player. `player.is_master` reflects the role the
/// player held when they left.
#[derive(Debug, Clone)]
pub struct Departure {
    pub player: PlayerInfo,
    pub new_master: Option<PlayerId>,
    pub new_turn: Option<PlayerId>,
    pub word_abandoned: bool,
    pub room_empty: bool,
}

/// A single hangman room. Players are kept in join order, which is also the
/// turn order. While no word is set the master holds the turn; otherwise the
/// turn belongs to a non-master player.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    round: u32,
    players: Vec<Player>,
    master_id: PlayerId,
    current_turn: PlayerId,
    current_word: Vec<LetterSlot>,
    guessed_letters: BTreeSet<char>,
    credited: Option<(PlayerId, FinishReason)>,
    finish_reported: bool,
    created_at: String,
    last_activity: Instant,
}

impl Room {
    pub fn new(id: RoomId, master_id: PlayerId, master_name: impl Into<String>) -> Self {
        Self {
            id,
            round: 0,
            players: vec![Player::new(master_id, master_name, 0)],
            master_id,
            current_turn: master_id,
            current_word: Vec::new(),
            guessed_letters: BTreeSet::new(),
            credited: None,
            finish_reported: false,
            created_at: chrono::Utc::now().to_rfc3339(),
            last_activity: Instant::now(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn master_id(&self) -> PlayerId {
        self.master_id
    }

    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_word(&self) -> &[LetterSlot] {
        &self.current_word
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn is_master(&self, player_id: PlayerId) -> bool {
        self.master_id == player_id
    }

    pub fn is_player_in_turn(&self, player_id: PlayerId) -> bool {
        self.current_turn == player_id
    }

    pub fn phase(&self) -> RoomPhase {
        if self.current_word.is_empty() {
            RoomPhase::AwaitingWord
        } else if self.is_complete() {
            RoomPhase::Finished
        } else {
            RoomPhase::InProgress
        }
    }

    /// True once every letter of the current word has been revealed.
    pub fn is_complete(&self) -> bool {
        !self.current_word.is_empty() && self.current_word.iter().all(|slot| slot.guessed)
    }

    pub fn player_info(&self, player_id: PlayerId) -> Option<PlayerInfo> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| self.info_for(p))
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            round: self.round,
            phase: self.phase(),
            players: self.players.iter().map(|p| self.info_for(p)).collect(),
            master_id: self.master_id,
            current_turn: self.current_turn,
            word: self
                .current_word
                .iter()
                .map(|slot| slot.guessed.then_some(slot.letter))
                .collect(),
            guessed_letters: self.guessed_letters.iter().copied().collect(),
            created_at: self.created_at.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_idle(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    /// Append a player at the end of the turn order. Adding a player that is
    /// already present returns their current info unchanged.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
        initial_points: u32,
    ) -> PlayerInfo {
        self.touch();
        if let Some(existing) = self.player_info(player_id) {
            return existing;
        }

        let player = Player::new(player_id, name, initial_points);
        let info = self.info_for(&player);
        self.players.push(player);
        info
    }

    pub fn set_word(&mut self, word: &str) -> Result<(), RoomError> {
        if self.phase() != RoomPhase::AwaitingWord {
            return Err(RoomError::WordAlreadySet);
        }
        let letters = normalize_word(word)?;
        if !self.has_guessers() {
            return Err(RoomError::NotEnoughPlayers);
        }

        self.current_word = letters
            .into_iter()
            .map(|letter| LetterSlot {
                letter,
                guessed: false,
            })
            .collect();
        self.guessed_letters.clear();
        self.credited = None;
        self.finish_reported = false;
        self.touch();

        debug!(
            "Room {} round {}: word set ({} letters)",
            self.id,
            self.round,
            self.current_word.len()
        );
        Ok(())
    }

    pub fn check_guess_is_present(&self, letter: char) -> bool {
        self.guessed_letters.contains(&fold_letter(letter))
    }

    /// Reveal every occurrence of `letter`. The guesser earns one point per
    /// revealed occurrence.
    pub fn add_guess(&mut self, player_id: PlayerId, letter: char) -> Result<GuessInfo, RoomError> {
        self.ensure_in_progress()?;
        if !letter.is_alphabetic() {
            return Err(RoomError::InvalidLetter {
                letter: letter.to_string(),
            });
        }
        let letter = fold_letter(letter);
        if self.guessed_letters.contains(&letter) {
            return Err(RoomError::DuplicateGuess { letter });
        }
        let index = self.player_index(player_id)?;

        let positions = self.reveal(letter);
        self.guessed_letters.insert(letter);

        let points_awarded = positions.len() as u32;
        let player = &mut self.players[index];
        player.points += points_awarded;
        let player_points = player.points;

        if !positions.is_empty() {
            self.credited = Some((player_id, FinishReason::LettersRevealed));
        }
        self.touch();

        Ok(GuessInfo {
            player_id,
            letter,
            hit: !positions.is_empty(),
            positions,
            points_awarded,
            player_points,
        })
    }

    /// Hand the turn to the next non-master player after the current holder,
    /// wrapping around the join order.
    pub fn update_next_turn(&mut self) -> Result<PlayerId, RoomError> {
        let start = self
            .player_position(self.current_turn)
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = self
            .next_guesser_from(start)
            .ok_or(RoomError::NotEnoughPlayers)?;
        self.current_turn = next;
        Ok(next)
    }

    /// Whole-word attempt. A correct guess reveals every hidden letter and
    /// credits the guesser with one point per newly revealed position.
    pub fn check_word_guess(
        &mut self,
        player_id: PlayerId,
        word: &str,
    ) -> Result<WordGuessInfo, RoomError> {
        self.ensure_in_progress()?;
        let index = self.player_index(player_id)?;
        if self.is_master(player_id) {
            return Err(RoomError::MasterCannotGuess);
        }
        let attempt = normalize_word(word)?;
        self.touch();

        let correct = attempt.len() == self.current_word.len()
            && attempt
                .iter()
                .zip(&self.current_word)
                .all(|(letter, slot)| *letter == slot.letter);

        if !correct {
            return Ok(WordGuessInfo {
                player_id,
                word: attempt.into_iter().collect(),
                correct: false,
                points_awarded: 0,
                revealed: Vec::new(),
            });
        }

        let mut hidden_letters: Vec<char> = Vec::new();
        for slot in self.current_word.iter().filter(|slot| !slot.guessed) {
            if !hidden_letters.contains(&slot.letter) {
                hidden_letters.push(slot.letter);
            }
        }

        let mut revealed = Vec::with_capacity(hidden_letters.len());
        for letter in hidden_letters {
            let positions = self.reveal(letter);
            self.guessed_letters.insert(letter);
            revealed.push((letter, positions));
        }

        let points_awarded: u32 = revealed.iter().map(|(_, p)| p.len() as u32).sum();
        let player = &mut self.players[index];
        player.points += points_awarded;
        let player_points = player.points;
        self.credited = Some((player_id, FinishReason::WordGuessed));

        Ok(WordGuessInfo {
            player_id,
            word: attempt.into_iter().collect(),
            correct: true,
            points_awarded,
            revealed: revealed
                .into_iter()
                .map(|(letter, positions)| GuessInfo {
                    player_id,
                    letter,
                    hit: true,
                    positions,
                    points_awarded: 0,
                    player_points,
                })
                .collect(),
        })
    }

    /// Produce the finish state for a completed word. Only the first call
    /// after completion returns `Some`.
    pub fn take_finish_state(&mut self) -> Option<FinishState> {
        if self.finish_reported || !self.is_complete() {
            return None;
        }
        self.finish_reported = true;

        let (player_id, reason) = self.credited?;
        let player = self.player_info(player_id)?;
        Some(FinishState {
            player,
            reason,
            word: self.current_word.iter().map(|slot| slot.letter).collect(),
        })
    }

    /// Start the next round: the master role moves to the next player in join
    /// order and the new master receives the turn. Returns the new master if
    /// the role changed hands.
    pub fn restart(&mut self) -> Option<PlayerId> {
        self.round += 1;
        self.clear_word();

        let previous = self.master_id;
        if let Some(index) = self.player_position(previous) {
            self.master_id = self.players[(index + 1) % self.players.len()].id;
        }
        self.current_turn = self.master_id;
        self.touch();

        (self.master_id != previous).then_some(self.master_id)
    }

    /// Remove a player from the turn order, reassigning the master role and
    /// the turn in the same step when the leaver held either.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Departure, RoomError> {
        let index = self.player_index(player_id)?;
        let was_master = self.is_master(player_id);
        let turn_before = self.current_turn;

        let removed = self.players.remove(index);
        let player = PlayerInfo {
            id: removed.id,
            name: removed.name,
            points: removed.points,
            is_master: was_master,
            joined_at: removed.joined_at,
        };
        self.touch();

        if self.players.is_empty() {
            return Ok(Departure {
                player,
                new_master: None,
                new_turn: None,
                word_abandoned: false,
                room_empty: true,
            });
        }

        // `index` now points at whoever followed the leaver.
        let follower = index % self.players.len();
        let mut new_master = None;
        if was_master {
            self.master_id = self.players[follower].id;
            new_master = Some(self.master_id);
        }

        let mut word_abandoned = false;
        match self.phase() {
            RoomPhase::AwaitingWord => self.current_turn = self.master_id,
            RoomPhase::InProgress => {
                if !self.has_guessers() {
                    self.clear_word();
                    self.current_turn = self.master_id;
                    word_abandoned = true;
                } else if turn_before == player_id {
                    if let Some(next) = self.next_guesser_from(follower) {
                        self.current_turn = next;
                    }
                } else if self.current_turn == self.master_id {
                    self.update_next_turn()?;
                }
            }
            RoomPhase::Finished => {
                if turn_before == player_id {
                    self.current_turn = self.master_id;
                }
            }
        }

        Ok(Departure {
            player,
            new_master,
            new_turn: (self.current_turn != turn_before).then_some(self.current_turn),
            word_abandoned,
            room_empty: false,
        })
    }

    /// Make `player_id` the master. While waiting for a word the new master
    /// takes the turn; mid-word, a new master that held the turn passes it on.
    /// Returns the new turn holder when the turn moved.
    pub fn update_master(&mut self, player_id: PlayerId) -> Result<Option<PlayerId>, RoomError> {
        self.player_index(player_id)?;
        let turn_before = self.current_turn;
        self.master_id = player_id;
        self.touch();

        match self.phase() {
            RoomPhase::AwaitingWord => self.current_turn = player_id,
            RoomPhase::InProgress => {
                // The demoted master is a guesser now
                if self.current_turn == player_id {
                    self.update_next_turn()?;
                }
            }
            RoomPhase::Finished => {}
        }

        Ok((self.current_turn != turn_before).then_some(self.current_turn))
    }

    fn info_for(&self, player: &Player) -> PlayerInfo {
        PlayerInfo {
            id: player.id,
            name: player.name.clone(),
            points: player.points,
            is_master: player.id == self.master_id,
            joined_at: player.joined_at.clone(),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), RoomError> {
        match self.phase() {
            RoomPhase::InProgress => Ok(()),
            RoomPhase::AwaitingWord => Err(RoomError::NoWordSet),
            RoomPhase::Finished => Err(RoomError::WordComplete),
        }
    }

    fn player_position(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    fn player_index(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        self.player_position(player_id)
            .ok_or(RoomError::PlayerNotFound { player_id })
    }

    fn has_guessers(&self) -> bool {
        self.players.iter().any(|p| p.id != self.master_id)
    }

    fn next_guesser_from(&self, start: usize) -> Option<PlayerId> {
        let len = self.players.len();
        (0..len)
            .map(|offset| &self.players[(start + offset) % len])
            .find(|p| p.id != self.master_id)
            .map(|p| p.id)
    }

    fn reveal(&mut self, letter: char) -> Vec<usize> {
        let mut positions = Vec::new();
        for (i, slot) in self.current_word.iter_mut().enumerate() {
            if slot.letter == letter && !slot.guessed {
                slot.guessed = true;
                positions.push(i);
            }
        }
        positions
    }

    fn clear_word(&mut self) {
        self.current_word.clear();
        self.guessed_letters.clear();
        self.credited = None;
        self.finish_reported = false;
    }
}
