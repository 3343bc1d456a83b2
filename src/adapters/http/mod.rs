//! HTTP adapters - REST API and WebSocket upgrade.
//!
//! [`build_router`] assembles the full application router:
//! - `/api/chat/*` - retrieval API
//! - `/api/presence` - presence announcements from the auth service
//! - `/ws` - real-time connection upgrade

pub mod chat;

pub use chat::{chat_routes, presence_routes, ChatHandlers};

use axum::Router;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::config::ServerConfig;

/// Assemble the application router with its middleware stack.
pub fn build_router(chat: ChatHandlers, ws: WebSocketState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .nest("/api/chat", chat_routes(chat.clone()))
        .nest("/api", presence_routes(chat))
        .merge(websocket_router().with_state(ws));

    router
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}
