use crate::errors::AppError;
use crate::models::{CreateCompletionRequest, CreateGoalRequest, PendingGoal};
use crate::state::AppState;
use crate::summary::{DisplaySummary, derive_view, week_range_label};
use crate::ui::render_page;
use crate::view::{View, compose, pending_buttons};
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::Local;
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let summary = state.observe_summary().await;
    if let Some(err) = &summary.error {
        warn!("summary unavailable, showing empty state: {err}");
    }

    let view = compose(&summary, state.locale);
    let pending = if matches!(view, View::Summary(_)) {
        let goals = state.pending_goals().await;
        goals
            .data
            .map(|goals| pending_buttons(&goals))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let week_label = week_range_label(Local::now().date_naive(), state.locale);
    Html(render_page(&view, &pending, &week_label, state.locale))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn get_view(State(state): State<AppState>) -> Json<View> {
    let summary = state.summary().await;
    Json(compose(&summary, state.locale))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<DisplaySummary>, AppError> {
    let summary = state.summary().await;
    if let Some(err) = summary.error {
        return Err(err.into());
    }
    let data = summary.data.unwrap_or_default();
    Ok(Json(derive_view(&data, state.locale)))
}

pub async fn get_pending_goals(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingGoal>>, AppError> {
    let goals = state.pending_goals().await;
    if let Some(err) = goals.error {
        return Err(err.into());
    }
    let goals = goals.data.map(|goals| goals.as_ref().clone()).unwrap_or_default();
    Ok(Json(goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<StatusCode, AppError> {
    state
        .mutations
        .create_goal(&payload.title, payload.frequency()?)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn create_completion(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompletionRequest>,
) -> Result<StatusCode, AppError> {
    state.mutations.complete_goal(&payload.goal_id).await?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_completion(
    State(state): State<AppState>,
    Path(completion_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.mutations.undo_completion(&completion_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_goal_form(
    State(state): State<AppState>,
    Form(form): Form<CreateGoalRequest>,
) -> Result<Redirect, AppError> {
    state
        .mutations
        .create_goal(&form.title, form.frequency()?)
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn complete_goal_form(
    State(state): State<AppState>,
    Form(form): Form<CreateCompletionRequest>,
) -> Result<Redirect, AppError> {
    state.mutations.complete_goal(&form.goal_id).await?;
    Ok(Redirect::to("/"))
}

pub async fn undo_completion_form(
    State(state): State<AppState>,
    Path(completion_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.mutations.undo_completion(&completion_id).await?;
    Ok(Redirect::to("/"))
}
