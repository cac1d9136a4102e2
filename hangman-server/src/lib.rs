use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Reply};

use crate::auth::AuthError;
use crate::room_manager::RoomManager;
use crate::websocket::SubscriberHub;
use hangman_core::{ErrorKind, RoomError};
use hangman_types::{
    CreateRoomRequest, ErrorResponse, JoinRoomRequest, LetterGuessRequest, SetWordRequest,
    SetWordResponse, WordGuessRequest,
};

pub mod auth;
pub mod config;
pub mod guards;
pub mod registry;
pub mod room_manager;
pub mod websocket;

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn create_routes(
    room_manager: Arc<RoomManager>,
    subscriber_hub: Arc<SubscriberHub>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let room_manager_filter = warp::any().map({
        let room_manager = room_manager.clone();
        move || room_manager.clone()
    });

    let subscriber_hub_filter = warp::any().map({
        let subscriber_hub = subscriber_hub.clone();
        move || subscriber_hub.clone()
    });

    let auth_header = warp::header::optional::<String>("authorization");

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_room = warp::path!("rooms")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body::<CreateRoomRequest>())
        .and(room_manager_filter.clone())
        .and_then(handle_create_room);

    let get_room = warp::path!("rooms" / Uuid)
        .and(warp::get())
        .and(room_manager_filter.clone())
        .and_then(handle_get_room);

    let restart_room = warp::path!("rooms" / Uuid / "restart")
        .and(warp::post())
        .and(auth_header.clone())
        .and(room_manager_filter.clone())
        .and_then(handle_restart_room);

    let join_room = warp::path!("rooms" / Uuid / "players")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body::<JoinRoomRequest>())
        .and(room_manager_filter.clone())
        .and_then(handle_join_room);

    let leave_room = warp::path!("rooms" / Uuid / "players" / Uuid)
        .and(warp::delete())
        .and(auth_header.clone())
        .and(room_manager_filter.clone())
        .and_then(handle_leave_room);

    let set_word = warp::path!("rooms" / Uuid / "word")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body::<SetWordRequest>())
        .and(room_manager_filter.clone())
        .and_then(handle_set_word);

    let guess_letter = warp::path!("rooms" / Uuid / "guesses")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body::<LetterGuessRequest>())
        .and(room_manager_filter.clone())
        .and_then(handle_guess_letter);

    let guess_word = warp::path!("rooms" / Uuid / "word-guesses")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body::<WordGuessRequest>())
        .and(room_manager_filter.clone())
        .and_then(handle_guess_word);

    // WebSocket event stream for one room
    let events = warp::path!("rooms" / Uuid / "events")
        .and(warp::ws())
        .and(room_manager_filter.clone())
        .and(subscriber_hub_filter.clone())
        .and_then(handle_subscribe);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "DELETE"]);

    health
        .or(create_room)
        .or(get_room)
        .or(restart_room)
        .or(join_room)
        .or(leave_room)
        .or(set_word)
        .or(guess_letter)
        .or(guess_word)
        .or(events)
        .with(cors)
        .with(warp::log("hangman"))
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(err: &RoomError) -> WithStatus<Json> {
    let status = match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    };
    tracing::debug!("Request rejected with {}: {}", status, err);
    json_reply(&ErrorResponse::new(err.to_string()), status)
}

fn auth_error_reply(err: &AuthError) -> WithStatus<Json> {
    json_reply(&ErrorResponse::new(err.to_string()), StatusCode::UNAUTHORIZED)
}

fn respond<T: Serialize>(result: Result<T, RoomError>) -> WithStatus<Json> {
    match result {
        Ok(value) => json_reply(&value, StatusCode::OK),
        Err(err) => error_reply(&err),
    }
}

async fn handle_create_room(
    auth_header: Option<String>,
    request: CreateRoomRequest,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    match room_manager.create_room(caller, &request.name).await {
        Ok(summary) => Ok(json_reply(&summary, StatusCode::CREATED)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_get_room(
    room_id: Uuid,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(respond(room_manager.get_room(room_id).await))
}

async fn handle_restart_room(
    room_id: Uuid,
    auth_header: Option<String>,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    Ok(respond(room_manager.restart_room(room_id, caller).await))
}

async fn handle_join_room(
    room_id: Uuid,
    auth_header: Option<String>,
    request: JoinRoomRequest,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    Ok(respond(
        room_manager
            .join_room(room_id, caller, &request.name)
            .await,
    ))
}

async fn handle_leave_room(
    room_id: Uuid,
    player_id: Uuid,
    auth_header: Option<String>,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    Ok(respond(room_manager.leave_room(room_id, caller, player_id).await))
}

async fn handle_set_word(
    room_id: Uuid,
    auth_header: Option<String>,
    request: SetWordRequest,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    let result = room_manager
        .set_word(room_id, caller, &request.word)
        .await
        .map(|word| SetWordResponse { word });
    Ok(respond(result))
}

async fn handle_guess_letter(
    room_id: Uuid,
    auth_header: Option<String>,
    request: LetterGuessRequest,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    Ok(respond(
        room_manager
            .guess_letter(room_id, caller, &request.letter)
            .await,
    ))
}

async fn handle_guess_word(
    room_id: Uuid,
    auth_header: Option<String>,
    request: WordGuessRequest,
    room_manager: Arc<RoomManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let caller = match auth::caller_from_header(auth_header.as_deref()) {
        Ok(caller) => caller,
        Err(err) => return Ok(auth_error_reply(&err)),
    };

    Ok(respond(
        room_manager
            .guess_word(room_id, caller, &request.word)
            .await,
    ))
}

async fn handle_subscribe(
    room_id: Uuid,
    ws: warp::ws::Ws,
    room_manager: Arc<RoomManager>,
    subscriber_hub: Arc<SubscriberHub>,
) -> Result<warp::reply::Response, warp::Rejection> {
    if let Err(err) = room_manager.get_room(room_id).await {
        return Ok(error_reply(&err).into_response());
    }

    Ok(ws
        .on_upgrade(move |socket| {
            websocket::handle_subscription(socket, room_id, room_manager, subscriber_hub)
        })
        .into_response())
}
