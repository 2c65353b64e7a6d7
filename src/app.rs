use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/goals", post(handlers::create_goal_form))
        .route("/completions", post(handlers::complete_goal_form))
        .route("/completions/:id/undo", post(handlers::undo_completion_form))
        .route("/api/view", get(handlers::get_view))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/pending-goals", get(handlers::get_pending_goals))
        .route("/api/goals", post(handlers::create_goal))
        .route("/api/completions", post(handlers::create_completion))
        .route("/api/completions/:id", delete(handlers::delete_completion))
        .with_state(state)
}
