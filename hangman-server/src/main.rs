use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use hangman_core::{EventLogger, InMemoryReturningPlayers, RoomEventBus};
use hangman_server::{
    config::Config, create_routes, registry::RoomRegistry, room_manager::RoomManager,
    websocket::SubscriberHub,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting hangman server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Whole-word guesses: {:?}, idle rooms expire after {} minutes",
        config.word_guess_policy, config.room_idle_timeout_minutes
    );

    // Initialize application state
    let subscriber_hub = Arc::new(SubscriberHub::new());
    let event_bus = RoomEventBus::new()
        .with_handler(subscriber_hub.clone())
        .with_handler(Arc::new(EventLogger));
    let registry = Arc::new(RoomRegistry::new(Arc::new(
        InMemoryReturningPlayers::new(),
    )));
    let room_manager = Arc::new(RoomManager::new(
        registry,
        Arc::new(event_bus),
        config.word_guess_policy,
    ));

    let routes = create_routes(room_manager.clone(), subscriber_hub.clone());

    // Start cleanup task
    let cleanup_room_manager = room_manager.clone();
    let idle_timeout = config.room_idle_timeout();
    let cleanup_interval = config.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let removed = cleanup_room_manager.cleanup_idle_rooms(idle_timeout).await;
            if !removed.is_empty() {
                info!("Cleaned up {} idle room(s)", removed.len());
            }
        }
    });

    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST: {}", config.host))?;

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((ip, config.port), shutdown_signal())
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};

        match (
            unix_signal(SignalKind::interrupt()),
            unix_signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            // Without a signal source the server runs until killed
            std::future::pending::<()>().await;
        }
    }
}
