use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

use hangman_core::{Room, RoomBroadcaster, RoomError, normalize_letter, normalize_name};
use hangman_types::{
    GuessInfo, PlayerId, PlayerInfo, RoomEvent, RoomId, RoomSummary, WordGuessInfo,
};

use crate::guards::{self, WordGuessPolicy};
use crate::registry::RoomRegistry;

/// Runs every room operation end to end: lookup, guard, transition and the
/// resulting broadcasts. The room stays locked for the whole sequence, so
/// subscribers see events in the order the transitions happened.
pub struct RoomManager {
    registry: Arc<RoomRegistry>,
    broadcaster: Arc<dyn RoomBroadcaster>,
    word_guess_policy: WordGuessPolicy,
}

impl RoomManager {
    pub fn new(
        registry: Arc<RoomRegistry>,
        broadcaster: Arc<dyn RoomBroadcaster>,
        word_guess_policy: WordGuessPolicy,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            word_guess_policy,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    pub fn word_guess_policy(&self) -> WordGuessPolicy {
        self.word_guess_policy
    }

    pub async fn create_room(
        &self,
        caller: PlayerId,
        name: &str,
    ) -> Result<RoomSummary, RoomError> {
        let name = normalize_name(name)?;
        let handle = self.registry.create_room(caller, name).await;
        let room = handle.lock().await;
        Ok(room.summary())
    }

    pub async fn get_room(&self, room_id: RoomId) -> Result<RoomSummary, RoomError> {
        let room = self.lock_room(room_id).await?;
        Ok(room.summary())
    }

    pub async fn restart_room(
        &self,
        room_id: RoomId,
        caller: PlayerId,
    ) -> Result<RoomSummary, RoomError> {
        let mut room = self.lock_room(room_id).await?;
        guards::ensure_master(&room, caller)?;

        let new_master = room.restart();
        let summary = room.summary();
        info!("Room {} restarted, round {}", room_id, summary.round);

        self.broadcast(
            room_id,
            RoomEvent::RoomRestarted {
                room: summary.clone(),
            },
        );
        if let Some(player_id) = new_master {
            self.broadcast(room_id, RoomEvent::MasterChanged { player_id });
        }
        self.broadcast(
            room_id,
            RoomEvent::NewTurn {
                player_id: room.current_turn(),
            },
        );

        Ok(summary)
    }

    pub async fn join_room(
        &self,
        room_id: RoomId,
        caller: PlayerId,
        name: &str,
    ) -> Result<PlayerInfo, RoomError> {
        let name = normalize_name(name)?;
        let mut room = self.lock_room(room_id).await?;
        if let Some(existing) = room.player_info(caller) {
            return Ok(existing);
        }

        let returning = self
            .registry
            .get_returning_player(caller)
            .filter(|record| record.room_id == room_id);
        let initial_points = returning.map(|record| record.points).unwrap_or(0);

        let player = self
            .registry
            .add_player(&mut room, caller, name, initial_points);
        info!("Player {} joined room {}", caller, room_id);
        self.broadcast(
            room_id,
            RoomEvent::PlayerJoined {
                player: player.clone(),
            },
        );

        if let Some(record) = returning {
            if record.was_master && record.round == room.round() {
                let new_turn = self.registry.update_master(&mut room, caller)?;
                info!("Returning master {} took over room {}", caller, room_id);
                self.broadcast(room_id, RoomEvent::MasterChanged { player_id: caller });
                if let Some(player_id) = new_turn {
                    self.broadcast(room_id, RoomEvent::NewTurn { player_id });
                }
            }
        }

        Ok(room.player_info(caller).unwrap_or(player))
    }

    pub async fn leave_room(
        &self,
        room_id: RoomId,
        caller: PlayerId,
        player_id: PlayerId,
    ) -> Result<PlayerInfo, RoomError> {
        guards::ensure_self(caller, player_id)?;
        let mut room = self.lock_room(room_id).await?;
        let departure = self.registry.remove_player(&mut room, player_id, true)?;
        info!("Player {} left room {}", player_id, room_id);

        self.broadcast(
            room_id,
            RoomEvent::PlayerLeft {
                player: departure.player.clone(),
            },
        );

        if departure.room_empty {
            self.registry.remove_room(room_id).await;
            self.broadcaster.room_closed(room_id);
            return Ok(departure.player);
        }

        if departure.word_abandoned {
            info!("Room {} has no guessers left, word abandoned", room_id);
        }
        if let Some(master_id) = departure.new_master {
            self.broadcast(
                room_id,
                RoomEvent::MasterChanged {
                    player_id: master_id,
                },
            );
        }
        if let Some(turn) = departure.new_turn {
            self.broadcast(room_id, RoomEvent::NewTurn { player_id: turn });
        }

        Ok(departure.player)
    }

    pub async fn set_word(
        &self,
        room_id: RoomId,
        caller: PlayerId,
        word: &str,
    ) -> Result<String, RoomError> {
        let mut room = self.lock_room(room_id).await?;
        guards::ensure_master(&room, caller)?;
        guards::ensure_turn_holder(&room, caller)?;

        room.set_word(word)?;
        let word_length = room.current_word().len();
        info!(
            "Word set in room {} for round {} ({} letters)",
            room_id,
            room.round(),
            word_length
        );
        self.broadcast(
            room_id,
            RoomEvent::WordSet {
                round: room.round(),
                word_length,
            },
        );

        let next = room.update_next_turn()?;
        self.broadcast(room_id, RoomEvent::NewTurn { player_id: next });

        Ok(room.current_word().iter().map(|slot| slot.letter).collect())
    }

    pub async fn guess_letter(
        &self,
        room_id: RoomId,
        caller: PlayerId,
        letter: &str,
    ) -> Result<GuessInfo, RoomError> {
        let letter = normalize_letter(letter)?;
        let mut room = self.lock_room(room_id).await?;
        guards::ensure_turn_holder(&room, caller)?;
        if room.check_guess_is_present(letter) {
            return Err(RoomError::DuplicateGuess { letter });
        }

        let guess = room.add_guess(caller, letter)?;
        debug!(
            "Room {}: {} guessed '{}' ({} hits)",
            room_id,
            caller,
            letter,
            guess.positions.len()
        );
        self.broadcast(
            room_id,
            RoomEvent::NewGuess {
                guess: guess.clone(),
            },
        );

        self.finish_or_advance(&mut room, Vec::new())?;
        Ok(guess)
    }

    pub async fn guess_word(
        &self,
        room_id: RoomId,
        caller: PlayerId,
        word: &str,
    ) -> Result<WordGuessInfo, RoomError> {
        let mut room = self.lock_room(room_id).await?;
        guards::ensure_word_guess_allowed(&room, caller, self.word_guess_policy)?;
        let held_turn = self.registry.is_player_in_turn(&room, caller);

        let guess = room.check_word_guess(caller, word)?;
        debug!(
            "Room {}: {} guessed the word ({})",
            room_id,
            caller,
            if guess.correct { "correct" } else { "wrong" }
        );
        self.broadcast(
            room_id,
            RoomEvent::NewWordGuess {
                guess: guess.clone(),
            },
        );

        if guess.correct {
            self.finish_or_advance(&mut room, guess.revealed.clone())?;
        } else if held_turn {
            let next = room.update_next_turn()?;
            self.broadcast(room_id, RoomEvent::NewTurn { player_id: next });
        }

        Ok(guess)
    }

    /// Remove idle rooms and tell subscribers they are gone.
    pub async fn cleanup_idle_rooms(&self, timeout: Duration) -> Vec<RoomId> {
        let removed = self.registry.cleanup_idle_rooms(timeout).await;
        for room_id in &removed {
            self.broadcaster.room_closed(*room_id);
        }
        removed
    }

    /// Announce a completed word, or pass the turn on when the word still has
    /// hidden letters.
    fn finish_or_advance(&self, room: &mut Room, reveals: Vec<GuessInfo>) -> Result<(), RoomError> {
        let room_id = room.id();

        if let Some(finish) = self.registry.check_game_finished(room) {
            for guess in reveals {
                self.broadcast(room_id, RoomEvent::NewGuess { guess });
            }
            info!(
                "Room {} round {} finished: '{}' credited to {}",
                room_id,
                room.round(),
                finish.word,
                finish.player.id
            );
            let player = finish.player.clone();
            self.broadcast(room_id, RoomEvent::GameFinished { finish });
            self.broadcast(room_id, RoomEvent::PlayerUpdated { player });
            return Ok(());
        }

        let next = room.update_next_turn()?;
        self.broadcast(room_id, RoomEvent::NewTurn { player_id: next });
        Ok(())
    }

    async fn lock_room(&self, room_id: RoomId) -> Result<OwnedMutexGuard<Room>, RoomError> {
        let handle = self.registry.get_room_by_id(room_id).await?;
        let room = handle.lock_owned().await;
        // A room can empty out between lookup and lock
        if room.is_empty() {
            return Err(RoomError::RoomNotFound { room_id });
        }
        Ok(room)
    }

    fn broadcast(&self, room_id: RoomId, event: RoomEvent) {
        self.broadcaster.broadcast(room_id, event);
    }
}
