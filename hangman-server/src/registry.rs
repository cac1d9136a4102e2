use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use hangman_core::{
    Departure, InMemoryReturningPlayers, ReturningPlayerRecord, ReturningPlayerStore, Room,
    RoomError,
};
use hangman_types::{FinishState, PlayerId, PlayerInfo, RoomId};

/// Shared handle to a room. Every lookup of the same id yields the same room.
pub type RoomHandle = Arc<Mutex<Room>>;

/// Owns every live room and the returning-player history.
///
/// Methods that take `&mut Room` expect the caller to hold the room's lock,
/// obtained through [`RoomRegistry::get_room_by_id`].
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    returning_players: Arc<dyn ReturningPlayerStore>,
}

impl RoomRegistry {
    pub fn new(returning_players: Arc<dyn ReturningPlayerStore>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            returning_players,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryReturningPlayers::new()))
    }

    pub async fn create_room(&self, master_user_id: PlayerId, master_name: &str) -> RoomHandle {
        let room_id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Room::new(room_id, master_user_id, master_name)));

        {
            let mut rooms = self.rooms.write().await;
            rooms.insert(room_id, handle.clone());
        }

        info!("Created room {} with master {}", room_id, master_user_id);
        handle
    }

    pub async fn get_room_by_id(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::RoomNotFound { room_id })
    }

    pub async fn remove_room(&self, room_id: RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        let removed = rooms.remove(&room_id).is_some();
        if removed {
            info!("Removed room {}", room_id);
        }
        removed
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub fn add_player(
        &self,
        room: &mut Room,
        user_id: PlayerId,
        name: &str,
        initial_points: u32,
    ) -> PlayerInfo {
        room.add_player(user_id, name, initial_points)
    }

    /// Take a player out of the room. With `save`, their standing is kept so a
    /// later rejoin can pick it up.
    pub fn remove_player(
        &self,
        room: &mut Room,
        player_id: PlayerId,
        save: bool,
    ) -> Result<Departure, RoomError> {
        let room_id = room.id();
        let round = room.round();
        let departure = room.remove_player(player_id)?;

        if save {
            self.returning_players.save(
                player_id,
                ReturningPlayerRecord {
                    room_id,
                    round,
                    was_master: departure.player.is_master,
                    points: departure.player.points,
                },
            );
        }

        Ok(departure)
    }

    pub fn get_returning_player(&self, user_id: PlayerId) -> Option<ReturningPlayerRecord> {
        self.returning_players.get(user_id)
    }

    pub fn update_master(
        &self,
        room: &mut Room,
        player_id: PlayerId,
    ) -> Result<Option<PlayerId>, RoomError> {
        room.update_master(player_id)
    }

    pub fn is_player_in_turn(&self, room: &Room, player_id: PlayerId) -> bool {
        room.is_player_in_turn(player_id)
    }

    /// Report a completed word once. Every player's standing is recorded at
    /// that moment.
    pub fn check_game_finished(&self, room: &mut Room) -> Option<FinishState> {
        let finish = room.take_finish_state()?;

        let room_id = room.id();
        let round = room.round();
        for player in room.summary().players {
            self.returning_players.save(
                player.id,
                ReturningPlayerRecord {
                    room_id,
                    round,
                    was_master: player.is_master,
                    points: player.points,
                },
            );
        }

        Some(finish)
    }

    /// Drop rooms that have been idle longer than `timeout`. Rooms whose lock
    /// is held are in use and are skipped.
    pub async fn cleanup_idle_rooms(&self, timeout: Duration) -> Vec<RoomId> {
        let mut rooms = self.rooms.write().await;

        let idle: Vec<RoomId> = rooms
            .iter()
            .filter(|(_, handle)| {
                handle
                    .try_lock()
                    .map(|room| room.is_empty() || room.is_idle(timeout))
                    .unwrap_or(false)
            })
            .map(|(room_id, _)| *room_id)
            .collect();

        for room_id in &idle {
            rooms.remove(room_id);
            info!("Removed idle room {}", room_id);
        }

        idle
    }
}
