//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use chat_core::{RecordId, UserId};

use crate::response::ApiError;

/// Record identifier from the last path segment (`/chat/:id`)
#[derive(Debug, Clone, Copy)]
pub struct RecordIdPath(pub RecordId);

#[async_trait]
impl<S> FromRequestParts<S> for RecordIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        raw.parse()
            .map(RecordIdPath)
            .map_err(|_| ApiError::invalid_path(format!("Invalid record id `{raw}`")))
    }
}

/// User identifier path parameter (`/participants/current/:user_id`)
#[derive(Debug, Clone)]
pub struct UserIdPath(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        UserId::parse(&raw)
            .map(UserIdPath)
            .map_err(|e| ApiError::invalid_path(e.to_string()))
    }
}
