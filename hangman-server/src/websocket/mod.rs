use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use warp::ws::{Message, WebSocket};

use hangman_types::{RoomEvent, RoomId};

use crate::room_manager::RoomManager;

pub mod connection;


pub use connection::{SubscriberHub, SubscriberId};

/// Register a subscriber, then confirm the room is still open. Returns `None`
/// once the subscription is withdrawn for a room that is gone.
async fn open_subscription(
    room_id: RoomId,
    room_manager: &RoomManager,
    hub: &SubscriberHub,
) -> Option<(SubscriberId, mpsc::UnboundedReceiver<RoomEvent>)> {
    let (subscriber_id, events) = hub.subscribe(room_id);
    if let Err(e) = room_manager.get_room(room_id).await {
        debug!(
            "Room {} closed before subscriber {} joined: {}",
            room_id, subscriber_id, e
        );
        hub.unsubscribe(room_id, subscriber_id);
        return None;
    }
    Some((subscriber_id, events))
}

/// Stream a room's events to one socket as JSON text frames until either
/// side goes away or the room is closed.
pub async fn handle_subscription(
    websocket: WebSocket,
    room_id: RoomId,
    room_manager: Arc<RoomManager>,
    hub: Arc<SubscriberHub>,
) {
    let (mut ws_sender, mut ws_receiver) = websocket.split();

    let Some((subscriber_id, mut events)) = open_subscription(room_id, &room_manager, &hub).await
    else {
        let _ = ws_sender.close().await;
        return;
    };
    info!("Subscriber {} watching room {}", subscriber_id, room_id);

    // Subscribers only listen; anything they send is ignored
    let incoming_handler = async move {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(msg) if msg.is_close() => break,
                Ok(msg) if msg.is_text() || msg.is_binary() => {
                    warn!(
                        "Ignoring message from subscriber {} of room {}",
                        subscriber_id, room_id
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error for subscriber {}: {}", subscriber_id, e);
                    break;
                }
            }
        }
    };

    let outgoing_handler = async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize event: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send event to {}: {:?}", subscriber_id, e);
                break;
            }
        }
        let _ = ws_sender.close().await;
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Subscriber {} left room {}", subscriber_id, room_id);
    hub.unsubscribe(room_id, subscriber_id);
}
