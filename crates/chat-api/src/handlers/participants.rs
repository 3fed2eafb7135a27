//! Participant status handlers
//!
//! The participant log is append-only. Creating a status over HTTP is not
//! pushed to connected clients.

use axum::{extract::State, Json};
use chat_core::{Collection, DomainError, ParticipantStatus, Stored};

use crate::extractors::{RecordBody, RecordIdPath, UserIdPath};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// List every recorded status change
///
/// GET /participants
pub async fn list_participants(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Stored<ParticipantStatus>>>> {
    Ok(Json(state.participants().list().await?))
}

/// Record a status change
///
/// POST /participants
pub async fn create_participant(
    State(state): State<AppState>,
    RecordBody(body): RecordBody,
) -> ApiResult<Created<Json<Stored<ParticipantStatus>>>> {
    let status = ParticipantStatus::from_value(body)?;
    let stored = state.participants().append(status).await?;
    Ok(Created(Json(stored)))
}

/// Get a status record by record id
///
/// GET /participants/{id}
pub async fn get_participant(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Json<Stored<ParticipantStatus>>> {
    let stored = state
        .participants()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::RecordNotFound(id))?;
    Ok(Json(stored))
}

/// Most recently recorded status of a user
///
/// GET /participants/current/{user_id}
pub async fn current_status(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<Stored<ParticipantStatus>>> {
    state
        .participants()
        .current_status(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No status recorded for user {user_id}")))
}
