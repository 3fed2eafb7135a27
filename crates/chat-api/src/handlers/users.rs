//! User directory handlers

use axum::{extract::State, Json};
use chat_core::{Collection, DomainError, Stored, UserIdentity};

use crate::extractors::{RecordBody, RecordIdPath};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List the directory
///
/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<Stored<UserIdentity>>>> {
    Ok(Json(state.users().list().await?))
}

/// Add a user; the `id` must not already be taken
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    RecordBody(body): RecordBody,
) -> ApiResult<Created<Json<Stored<UserIdentity>>>> {
    let user = UserIdentity::from_value(body)?;
    let stored = state.users().append(user).await?;
    Ok(Created(Json(stored)))
}

/// Get user by record id
///
/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Json<Stored<UserIdentity>>> {
    let stored = state
        .users()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::RecordNotFound(id))?;
    Ok(Json(stored))
}
