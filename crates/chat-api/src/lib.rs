//! # chat-api
//!
//! REST surface over the chat log, the user directory and the participant log.
//! Creating a chat message pushes it to every connected client through the
//! [`chat_core::EventPublisher`] held in [`AppState`].

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use middleware::apply_middleware;
pub use response::{ApiError, ApiResult};
pub use routes::{create_app, create_router};
pub use state::AppState;
