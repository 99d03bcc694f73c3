//! Cyoa API — HTTP surface of the adventure story service.

use axum::Router;
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn app(state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::stories::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
