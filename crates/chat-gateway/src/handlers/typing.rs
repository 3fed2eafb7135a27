//! `typingChange` handler

use super::{DispatchOutcome, EventDispatcher, EventError, HandlerResult};
use crate::connection::Connection;
use crate::events::{InboundEventType, TypingChange, UserRef};
use chat_core::{UnknownUserPolicy, UserIdentity};
use serde_json::Value;

/// Handles typing indicator toggles
pub struct TypingHandler;

impl TypingHandler {
    /// Validate, resolve the user, update presence and broadcast the new typer list
    pub async fn handle(
        dispatcher: &EventDispatcher,
        connection: &Connection,
        data: &Value,
    ) -> HandlerResult<DispatchOutcome> {
        let event = InboundEventType::TypingChange.as_str();
        let change = TypingChange::from_value(data).map_err(|reason| EventError::malformed(event, reason))?;

        let bound = connection.user();
        let user_id = match (&change.user, &bound) {
            (Some(user), _) => user.id().clone(),
            (None, Some(bound)) => bound.clone(),
            (None, None) => {
                return Err(EventError::malformed(
                    event,
                    "missing `user` on a connection with no bound user",
                ))
            }
        };

        if let Some(bound) = bound.filter(|bound| *bound != user_id) {
            return Err(EventError::UserMismatch {
                bound,
                claimed: user_id,
            });
        }

        let identity = match dispatcher.users().find_by_user_id(&user_id).await? {
            Some(identity) => identity,
            None => match dispatcher.policy() {
                UnknownUserPolicy::Reject => return Err(EventError::UnknownUser(user_id)),
                UnknownUserPolicy::AutoRegister => {
                    tracing::debug!(user_id = %user_id, "Registering presence for unknown user");
                    change
                        .user
                        .map_or_else(|| UserIdentity::new(user_id.clone()), UserRef::into_identity)
                }
            },
        };

        connection
            .bind_user(&user_id)
            .map_err(|bound| EventError::UserMismatch {
                bound,
                claimed: user_id.clone(),
            })?;

        dispatcher.store().set_typing(identity, change.typing);

        tracing::debug!(
            connection_id = %connection.id(),
            user_id = %user_id,
            typing = change.typing,
            "Typing state changed"
        );

        Ok(DispatchOutcome::TypingBroadcast(
            dispatcher.engine().on_presence_changed(),
        ))
    }
}
