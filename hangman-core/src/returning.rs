use dashmap::DashMap;
use hangman_types::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

/// What a user looked like the last time they left a room or finished a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturningPlayerRecord {
    pub room_id: RoomId,
    pub round: u32,
    pub was_master: bool,
    pub points: u32,
}

/// Session history keyed by user id. Records are overwritten on every save and
/// never expire; reading does not consume them.
pub trait ReturningPlayerStore: Send + Sync {
    fn save(&self, user_id: PlayerId, record: ReturningPlayerRecord);
    fn get(&self, user_id: PlayerId) -> Option<ReturningPlayerRecord>;
}

/// Process-local store. Each user id lives in its own shard entry, so
/// concurrent writers for different users never contend on one lock.
#[derive(Debug, Default)]
pub struct InMemoryReturningPlayers {
    records: DashMap<PlayerId, ReturningPlayerRecord>,
}

impl InMemoryReturningPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReturningPlayerStore for InMemoryReturningPlayers {
    fn save(&self, user_id: PlayerId, record: ReturningPlayerRecord) {
        self.records.insert(user_id, record);
    }

    fn get(&self, user_id: PlayerId) -> Option<ReturningPlayerRecord> {
        self.records.get(&user_id).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use uuid::Uuid;

    fn record(room_id: RoomId, points: u32) -> ReturningPlayerRecord {
        ReturningPlayerRecord {
            room_id,
            round: 1,
            was_master: false,
            points,
        }
    }

    #[test]
    fn test_save_overwrites_and_get_does_not_consume() {
        let store = InMemoryReturningPlayers::new();
        let user = Uuid::new_v4();
        let room = Uuid::new_v4();

        assert!(store.get(user).is_none());

        store.save(user, record(room, 3));
        store.save(user, record(room, 7));

        assert_eq!(store.get(user).unwrap().points, 7);
        assert_eq!(store.get(user).unwrap().points, 7);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_record_json_shape() {
        let room = Uuid::new_v4();
        let saved = ReturningPlayerRecord {
            room_id: room,
            round: 2,
            was_master: true,
            points: 5,
        };

        let value = serde_json::to_value(saved).unwrap();
        assert_eq!(value["room_id"], room.to_string());
        assert_eq!(value["round"], 2);
        assert_eq!(value["was_master"], true);
        assert_eq!(value["points"], 5);

        let restored: ReturningPlayerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(restored, saved);
    }

    #[test]
    fn test_concurrent_saves_for_different_users() {
        let store = Arc::new(InMemoryReturningPlayers::new());
        let room = Uuid::new_v4();
        let users: Vec<_> = (0..32).map(|_| Uuid::new_v4()).collect();

        let handles: Vec<_> = users
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let store = store.clone();
                let user = *user;
                std::thread::spawn(move || {
                    for points in 0..=i as u32 {
                        store.save(user, record(room, points));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), users.len());
        for (i, user) in users.iter().enumerate() {
            assert_eq!(store.get(*user).unwrap().points, i as u32);
        }
    }
}
