//! Route definitions
//!
//! One route group per collection, mounted at the root: `/chat`, `/users`
//! and `/participants`.

use axum::{routing::get, Router};

use crate::handlers::{health, messages, participants, users};
use crate::state::AppState;

/// Build the REST application with its state applied
pub fn create_app(state: AppState) -> Router {
    create_router().with_state(state)
}

/// Create the REST router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(chat_routes())
        .merge(user_routes())
        .merge(participant_routes())
}

/// Chat log routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", get(messages::list_messages).post(messages::create_message))
        .route("/chat/:id", get(messages::get_message))
}

/// User directory routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user))
}

/// Participant status routes
fn participant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/participants",
            get(participants::list_participants).post(participants::create_participant),
        )
        .route("/participants/:id", get(participants::get_participant))
        .route("/participants/current/:user_id", get(participants::current_status))
}
