//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/campaigns",
            get(handlers::campaign::list_campaigns).post(handlers::campaign::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(handlers::campaign::get_campaign)
                .put(handlers::campaign::update_campaign)
                .delete(handlers::campaign::delete_campaign)
                .post(handlers::chat::submit_turn),
        )
        .route(
            "/campaigns/{id}/chats",
            get(handlers::chat::list_turns)
                .post(handlers::chat::submit_turn)
                .delete(handlers::chat::delete_turns),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
