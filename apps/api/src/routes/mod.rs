pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;
use crate::web;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Web form
        .route("/", get(web::handle_form_page))
        .route("/form/match", post(web::handle_form_match))
        .route("/form/detailed", post(web::handle_form_detailed))
        // Matching API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/detailed", post(handlers::handle_detailed_match))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
