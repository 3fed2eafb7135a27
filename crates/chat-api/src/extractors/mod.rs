//! Axum extractors for request handling

mod body;
mod path;

pub use body::RecordBody;
pub use path::{RecordIdPath, UserIdPath};
