use std::sync::Arc;

use hangman_types::{RoomEvent, RoomId};

/// Receives every event a room emits. Implementations must not block: events
/// are delivered while the room is still locked so that subscribers observe
/// them in commit order.
pub trait RoomBroadcaster: Send + Sync {
    fn broadcast(&self, room_id: RoomId, event: RoomEvent);

    /// Called once a room has been removed; no further events follow.
    fn room_closed(&self, _room_id: RoomId) {}
}

/// Fans each event out to all registered broadcasters, in registration order.
#[derive(Clone, Default)]
pub struct RoomEventBus {
    handlers: Vec<Arc<dyn RoomBroadcaster>>,
}

impl RoomEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn RoomBroadcaster>) {
        self.handlers.push(handler);
    }

    pub fn with_handler(mut self, handler: Arc<dyn RoomBroadcaster>) -> Self {
        self.add_handler(handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl RoomBroadcaster for RoomEventBus {
    fn broadcast(&self, room_id: RoomId, event: RoomEvent) {
        for handler in &self.handlers {
            handler.broadcast(room_id, event.clone());
        }
    }

    fn room_closed(&self, room_id: RoomId) {
        for handler in &self.handlers {
            handler.room_closed(room_id);
        }
    }
}

/// Writes every event to the log.
pub struct EventLogger;

impl RoomBroadcaster for EventLogger {
    fn broadcast(&self, room_id: RoomId, event: RoomEvent) {
        tracing::debug!("room {} -> {}", room_id, event.name());
    }

    fn room_closed(&self, room_id: RoomId) {
        tracing::debug!("room {} closed", room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct TestHandler {
        events: Mutex<Vec<(RoomId, RoomEvent)>>,
        closed: Mutex<Vec<RoomId>>,
    }

    impl RoomBroadcaster for TestHandler {
        fn broadcast(&self, room_id: RoomId, event: RoomEvent) {
            self.events.lock().unwrap().push((room_id, event));
        }

        fn room_closed(&self, room_id: RoomId) {
            self.closed.lock().unwrap().push(room_id);
        }
    }

    #[test]
    fn test_event_bus_fans_out_in_order() {
        let first = Arc::new(TestHandler::default());
        let second = Arc::new(TestHandler::default());
        let bus = RoomEventBus::new()
            .with_handler(first.clone())
            .with_handler(second.clone())
            .with_handler(Arc::new(EventLogger));
        assert_eq!(bus.handler_count(), 3);

        let room_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        bus.broadcast(room_id, RoomEvent::MasterChanged { player_id });
        bus.broadcast(room_id, RoomEvent::NewTurn { player_id });

        for handler in [&first, &second] {
            let events = handler.events.lock().unwrap();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].0, room_id);
            assert_eq!(events[0].1.name(), "master_changed");
            assert_eq!(events[1].1.name(), "new_turn");
        }
    }

    #[test]
    fn test_room_closed_reaches_every_handler() {
        let first = Arc::new(TestHandler::default());
        let second = Arc::new(TestHandler::default());
        let mut bus = RoomEventBus::new();
        bus.add_handler(first.clone());
        bus.add_handler(second.clone());

        let room_id = Uuid::new_v4();
        bus.room_closed(room_id);

        assert_eq!(*first.closed.lock().unwrap(), vec![room_id]);
        assert_eq!(*second.closed.lock().unwrap(), vec![room_id]);
    }

    #[test]
    fn test_empty_bus_is_a_no_op() {
        let bus = RoomEventBus::default();
        bus.broadcast(
            Uuid::new_v4(),
            RoomEvent::NewTurn {
                player_id: Uuid::new_v4(),
            },
        );
        assert_eq!(bus.handler_count(), 0);
    }
}
