//! Route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/query", post(handlers::execute_query))
        .route("/health", get(handlers::health_check))
}
