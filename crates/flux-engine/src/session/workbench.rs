//! Workbench session acquisition (spec §4.6).

use flux_core::error::ErrorContext;
use flux_core::world::{Session, SessionData, SessionStatus, SessionStrategy, WorkbenchSessionData};
use flux_core::{ActorUrn, ErrorCode, EventPayload, EventType, PlaceUrn, SessionUrn, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};

/// Finds or creates the pending workbench session for `actor_id`.
///
/// Returns `(session_urn, is_new)`. `is_new` is `false` both when an
/// explicit `session_id` names an existing session owned by this actor,
/// and when one was already pending and is silently reused — only a
/// brand new session counts as "new" for event-emission purposes.
pub fn acquire_or_create_workbench_session(
    ctx: &mut TransformerContext<'_>,
    actor_id: &ActorUrn,
    location: &PlaceUrn,
    session_id: Option<SessionUrn>,
) -> Result<(SessionUrn, bool), DispatchError> {
    if let Some(sid) = session_id {
        if let Some(session) = ctx.world.session(&sid) {
            if session.status != SessionStatus::Ended
                && session
                    .as_workbench()
                    .is_some_and(|data| &data.actor_id == actor_id)
            {
                return Ok((sid, false));
            }
        }
    }

    if let Some(existing) = ctx.world.pending_workbench_session_for(actor_id) {
        return Ok((existing.urn.clone(), false));
    }

    let actor = ctx.world.actor(actor_id).ok_or_else(|| {
        DispatchError::declared_with(
            ErrorCode::InvalidTarget,
            ReducerPhase::Apply,
            "actor does not exist",
            ErrorContext::new().with_actor(actor_id.clone()),
        )
    })?;
    let shell_id = actor.current_shell.clone().ok_or_else(|| {
        DispatchError::declared(
            ErrorCode::PreconditionFailed,
            ReducerPhase::Apply,
            "actor has no current shell to open a workbench session for",
        )
    })?;

    let uid = ctx.uniqid();
    let urn: SessionUrn = format!("flux:session:workbench:{uid}")
        .parse()
        .expect("generated session urn is always well-formed");

    let session = Session {
        urn: urn.clone(),
        strategy: SessionStrategy::Workbench,
        status: SessionStatus::Pending,
        data: SessionData::Workbench(WorkbenchSessionData {
            actor_id: actor_id.clone(),
            current_shell_id: shell_id,
            pending_mutations: Vec::new(),
        }),
        created_at: ctx.now(),
    };
    ctx.world.insert_session(session);

    let now = ctx.now();
    if let Some(actor) = ctx.world.actor_mut(actor_id) {
        actor.sessions.insert(urn.clone(), now);
    }

    ctx.declare_event(
        EventType::WorkbenchSessionDidStart,
        actor_id.clone(),
        location.clone(),
        EventPayload::Session {
            session: urn.clone(),
        },
    );

    Ok((urn, true))
}
