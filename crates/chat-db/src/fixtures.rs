//! User directory fixtures
//!
//! The directory is seeded at startup from a JSON file shaped as an object keyed
//! by handle, e.g. `{"alice": {"id": "alice", "name": "Alice"}}`. A plain array of
//! user objects is accepted as well. Users are appended in file order.

use std::path::Path;

use chat_core::{Collection, DomainError, UserIdentity, UserRepository};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading a fixture file
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Fixture must be a JSON object keyed by handle or an array of users")]
    InvalidShape,

    #[error("Invalid user `{handle}`: {source}")]
    InvalidUser {
        handle: String,
        #[source]
        source: DomainError,
    },

    #[error("Failed to store user: {0}")]
    Repository(#[from] DomainError),
}

/// Parse the users of a fixture document, keeping file order
pub fn parse_users(document: Value) -> Result<Vec<UserIdentity>, FixtureError> {
    let entries: Vec<(String, Value)> = match document {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => return Err(FixtureError::InvalidShape),
    };

    entries
        .into_iter()
        .map(|(handle, value)| {
            UserIdentity::from_value(value).map_err(|source| FixtureError::InvalidUser { handle, source })
        })
        .collect()
}

/// Load a fixture file into the user directory, returning how many users were added
pub async fn load_users<R>(path: impl AsRef<Path>, users: &R) -> Result<usize, FixtureError>
where
    R: UserRepository + ?Sized,
{
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let parsed = parse_users(serde_json::from_str(&raw)?)?;
    let count = parsed.len();

    for user in parsed {
        users.append(user).await?;
    }

    tracing::info!(path = %path.display(), count, "User directory loaded");
    Ok(count)
}
