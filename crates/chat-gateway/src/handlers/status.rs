//! `statusChange` handler

use super::{DispatchOutcome, EventDispatcher, EventError, HandlerResult};
use crate::connection::Connection;
use crate::events::InboundEventType;
use chat_core::ParticipantStatus;
use serde_json::Value;

/// Handles participant status changes
///
/// The payload is appended to the participant log as received. Status
/// changes are never broadcast.
pub struct StatusHandler;

impl StatusHandler {
    pub async fn handle(
        dispatcher: &EventDispatcher,
        connection: &Connection,
        data: Value,
    ) -> HandlerResult<DispatchOutcome> {
        let status = ParticipantStatus::from_value(data)
            .map_err(|e| EventError::malformed(InboundEventType::StatusChange.as_str(), e.to_string()))?;
        let user_id = status.user_id().clone();

        if let Some(bound) = connection.user().filter(|bound| *bound != user_id) {
            return Err(EventError::UserMismatch {
                bound,
                claimed: user_id,
            });
        }

        let stored = dispatcher.participants().append(status).await?;

        // Bound concurrently since the check above; the status is already recorded
        if let Err(bound) = connection.bind_user(&user_id) {
            tracing::warn!(
                connection_id = %connection.id(),
                bound = %bound,
                claimed = %user_id,
                "Status recorded for a user other than the bound one"
            );
        }

        tracing::debug!(
            connection_id = %connection.id(),
            user_id = %user_id,
            record_id = %stored.id,
            "Participant status recorded"
        );

        Ok(DispatchOutcome::StatusRecorded(stored.id))
    }
}
