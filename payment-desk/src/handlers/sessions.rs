//! Form session lifecycle: open, inspect, reset and close.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::session::SessionSnapshot;
use crate::AppState;

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let snapshot = state.desk.sessions().create();
    tracing::info!(session_id = %snapshot.session_id, "Form session opened");
    (StatusCode::CREATED, Json(snapshot))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.desk.sessions().snapshot(session_id)?;
    Ok(Json(snapshot))
}

/// Clear the form back to `idle`, discarding any summary or link.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.desk.sessions().reset(session_id)?;
    tracing::info!(session_id = %session_id, "Form session reset");
    Ok(Json(snapshot))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.desk.sessions().remove(session_id)?;
    tracing::info!(session_id = %session_id, "Form session closed");
    Ok(StatusCode::NO_CONTENT)
}
