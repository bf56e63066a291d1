//! Route Configuration
//!
//! Configures all HTTP routes for the API.
//!
//! Unary chat routes run behind two layers of middleware, admission
//! outermost: a request is counted against the rate limit before the
//! deadline clock starts. The streaming connect route and the health
//! probes bypass both.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::{admission_middleware, deadline_middleware};
use crate::presentation::stream::connect_chat;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(chat_routes(state))
        // Streaming join: long-lived, so no admission or deadline
        .route("/chats/{chat_id}/connect", get(connect_chat))
}

/// Unary chat routes (rate limited, deadline bounded)
fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chats", post(handlers::chat::create_chat))
        .route(
            "/chats/{chat_id}",
            get(handlers::chat::get_chat).delete(handlers::chat::delete_chat),
        )
        .route(
            "/chats/{chat_id}/messages",
            post(handlers::chat::send_message),
        )
        // Layer order matters: the last route_layer added runs first.
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            deadline_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, admission_middleware))
}
