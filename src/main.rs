//! Tutor Chat server binary.

use std::sync::Arc;

use tutor_chat::adapters::http::{build_router, ChatHandlers};
use tutor_chat::adapters::postgres::{
    PostgresMessageReader, PostgresMessageRepository, PostgresUnreadCounterRepository,
    PostgresUserDirectory,
};
use tutor_chat::adapters::websocket::{RoomHub, WebSocketState};
use tutor_chat::application::handlers::{
    DeleteMessageHandler, MarkRoomReadHandler, MessageRouter, PresenceHandler, PurgeRoomHandler,
    RoomMessagesHandler, RoomSummaryHandler, UnreadCounterEngine,
};
use tutor_chat::config::AppConfig;
use tutor_chat::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_logging(&config.server)?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let messages = Arc::new(PostgresMessageRepository::new(pool.clone()));
    let reader = Arc::new(PostgresMessageReader::new(pool.clone()));
    let counters = Arc::new(PostgresUnreadCounterRepository::new(pool.clone()));
    let directory = Arc::new(PostgresUserDirectory::new(pool));

    let messaging = &config.messaging;
    let hub = Arc::new(RoomHub::new(messaging.connection_buffer));
    let engine = Arc::new(UnreadCounterEngine::new(counters, directory.clone()));
    let router = Arc::new(MessageRouter::new(messages.clone(), engine.clone(), hub.clone()));

    let chat = ChatHandlers::new(
        Arc::new(RoomMessagesHandler::new(
            reader.clone(),
            messaging.live_window,
            messaging.archive_page_size,
        )),
        Arc::new(DeleteMessageHandler::new(messages.clone(), hub.clone())),
        Arc::new(MarkRoomReadHandler::new(messages.clone())),
        engine,
        Arc::new(PurgeRoomHandler::new(messages)),
        Arc::new(RoomSummaryHandler::new(reader, messaging.max_summary_rooms)),
        Arc::new(PresenceHandler::new(hub.clone(), directory)),
    );
    let ws = WebSocketState::new(hub, router);
    let app = build_router(chat, ws, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "tutor-chat listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tutor-chat stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
