use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Wizard page
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))

        // Tiers and question sets
        .route("/api/tiers", get(handlers::list_tiers))
        .route("/api/tiers/{tier}/questions", get(handlers::tier_questions))

        // Diagnostic sessions
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/{id}", get(handlers::get_session))
        .route("/api/sessions/{id}/begin", post(handlers::begin_session))
        .route("/api/sessions/{id}/submit", post(handlers::submit_session))

        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
