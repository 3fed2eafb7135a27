//! Chat log handlers

use axum::{extract::State, Json};
use chat_core::{ChatMessage, Collection, DomainError, Stored};

use crate::extractors::{RecordBody, RecordIdPath};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Realtime event pushed when a message is created
pub const MESSAGE_CREATED_EVENT: &str = "message";

/// List the chat log in append order
///
/// GET /chat
pub async fn list_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Stored<ChatMessage>>>> {
    Ok(Json(state.messages().list().await?))
}

/// Append a message and push it to every connected client
///
/// POST /chat
pub async fn create_message(
    State(state): State<AppState>,
    RecordBody(body): RecordBody,
) -> ApiResult<Created<Json<Stored<ChatMessage>>>> {
    let message = ChatMessage::from_value(body)?;
    let stored = state.messages().append(message).await?;

    let payload = serde_json::to_value(&stored).map_err(ApiError::internal)?;
    let delivered = state.publisher().publish(MESSAGE_CREATED_EVENT, payload);

    tracing::debug!(record_id = %stored.id, delivered, "Chat message created");

    Ok(Created(Json(stored)))
}

/// Get message by record id
///
/// GET /chat/{id}
pub async fn get_message(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Json<Stored<ChatMessage>>> {
    let stored = state
        .messages()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::RecordNotFound(id))?;
    Ok(Json(stored))
}
