use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/complete", post(handlers::complete_task))
        .route("/tasks/delete", post(handlers::delete_task))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
