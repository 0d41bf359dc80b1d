// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{event, missing_target, unexpected_target};
use crate::command::PauseCommand;
use crate::error::CoreError;
use crate::state::{PauseContext, TransitionResult};
use carhive_audit::{Actor, AuditEvent, EntityKind};
use carhive_domain::{DomainError, PauseRequest, PauseStatus, Role};

/// Applies a pause command.
///
/// A pause requested by an admin is approved on creation; one requested by
/// a fleet owner waits for an admin decision.
///
/// # Errors
///
/// Returns an error if:
/// - The car is deleted
/// - The reason is blank
/// - The decision is not permitted by the pause lifecycle
pub fn apply_pause(
    context: &PauseContext<'_>,
    current: Option<&PauseRequest>,
    command: PauseCommand,
    actor: Actor,
) -> Result<TransitionResult<PauseRequest>, CoreError> {
    match (current, command) {
        (
            None,
            PauseCommand::Request {
                car_id,
                reason,
                schedule,
                note,
            },
        ) => {
            if context.car.is_deleted() {
                return Err(DomainError::CarDeleted(car_id).into());
            }

            let mut pause: PauseRequest =
                PauseRequest::new(car_id, actor.user_id, &reason, schedule, note.as_deref())?;
            if actor.role == Role::Admin {
                pause.status = PauseStatus::Approved;
                pause.decided_by = Some(actor.user_id);
            }

            let audit_event: AuditEvent = event(
                actor,
                "RequestPause",
                Some(pause.reason.clone()),
                EntityKind::Pause,
                None,
                String::from("none"),
                pause.snapshot(),
            );
            Ok(TransitionResult::applied(pause, audit_event))
        }
        (Some(_), PauseCommand::Request { .. }) => Err(unexpected_target("pause")),
        (None, PauseCommand::Decide { .. }) => Err(missing_target("pause")),
        (Some(pause), PauseCommand::Decide { status }) => {
            if pause.status == status {
                return Ok(TransitionResult::unchanged(pause.clone()));
            }
            pause.status.validate_transition(status)?;

            let mut updated: PauseRequest = pause.clone();
            updated.status = status;
            updated.decided_by = Some(actor.user_id);

            let audit_event: AuditEvent = event(
                actor,
                "DecidePause",
                Some(format!(
                    "Pause {} -> {}",
                    pause.status.as_str(),
                    status.as_str()
                )),
                EntityKind::Pause,
                pause.pause_id,
                pause.snapshot(),
                updated.snapshot(),
            );
            Ok(TransitionResult::applied(updated, audit_event))
        }
    }
}
