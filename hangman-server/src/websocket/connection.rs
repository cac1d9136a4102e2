use std::collections::HashMap;
use std::fmt;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use hangman_core::RoomBroadcaster;
use hangman_types::{RoomEvent, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-room fan-out to connected event streams.
#[derive(Default)]
pub struct SubscriberHub {
    rooms: DashMap<RoomId, HashMap<SubscriberId, mpsc::UnboundedSender<RoomEvent>>>,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        room_id: RoomId,
    ) -> (SubscriberId, mpsc::UnboundedReceiver<RoomEvent>) {
        let id = SubscriberId::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.rooms.entry(room_id).or_default().insert(id, sender);
        (id, receiver)
    }

    pub fn unsubscribe(&self, room_id: RoomId, id: SubscriberId) {
        if let Some(mut subscribers) = self.rooms.get_mut(&room_id) {
            subscribers.remove(&id);
        }
        self.rooms
            .remove_if(&room_id, |_, subscribers| subscribers.is_empty());
    }

    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.rooms
            .get(&room_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl RoomBroadcaster for SubscriberHub {
    fn broadcast(&self, room_id: RoomId, event: RoomEvent) {
        if let Some(mut subscribers) = self.rooms.get_mut(&room_id) {
            subscribers.retain(|id, sender| {
                let delivered = sender.send(event.clone()).is_ok();
                if !delivered {
                    debug!("Dropping closed subscriber {} of room {}", id, room_id);
                }
                delivered
            });
        }
    }

    fn room_closed(&self, room_id: RoomId) {
        // Dropping the senders ends every stream for this room
        if let Some((_, subscribers)) = self.rooms.remove(&room_id) {
            debug!(
                "Closed {} subscriber(s) of room {}",
                subscribers.len(),
                room_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_reach_only_their_room() {
        let hub = SubscriberHub::new();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();
        let (_, mut rx_a) = hub.subscribe(room_a);
        let (_, mut rx_b) = hub.subscribe(room_b);

        let player_id = Uuid::new_v4();
        hub.broadcast(room_a, RoomEvent::NewTurn { player_id });

        assert_eq!(rx_a.recv().await, Some(RoomEvent::NewTurn { player_id }));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_receivers_are_pruned() {
        let hub = SubscriberHub::new();
        let room_id = Uuid::new_v4();
        let (_, rx_dropped) = hub.subscribe(room_id);
        let (_, mut rx_kept) = hub.subscribe(room_id);
        assert_eq!(hub.subscriber_count(room_id), 2);

        drop(rx_dropped);
        hub.broadcast(
            room_id,
            RoomEvent::MasterChanged {
                player_id: Uuid::new_v4(),
            },
        );

        assert_eq!(hub.subscriber_count(room_id), 1);
        assert!(rx_kept.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unsubscribe_and_close() {
        let hub = SubscriberHub::new();
        let room_id = Uuid::new_v4();
        let (first, _rx_first) = hub.subscribe(room_id);
        let (_, mut rx_second) = hub.subscribe(room_id);

        hub.unsubscribe(room_id, first);
        assert_eq!(hub.subscriber_count(room_id), 1);

        hub.room_closed(room_id);
        assert_eq!(hub.room_count(), 0);
        assert_eq!(rx_second.recv().await, None);
    }
}
