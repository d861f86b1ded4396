//! Combat session acquisition, combatant management, and round/turn
//! advancement (spec §4.6).

use flux_core::dice::RandomSource;
use flux_core::world::{CombatSessionData, Session, SessionData, SessionStatus, SessionStrategy, Team};
use flux_core::{ActorUrn, EventPayload, EventType, PlaceUrn, SessionUrn, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};

/// Finds the running combat session at `location`, or creates one.
/// Newly created sessions start `Pending` with no combatants; the
/// caller is responsible for adding `actor_id` via [`add_combatant`]
/// immediately after.
pub fn acquire_or_create_combat_session(
    ctx: &mut TransformerContext<'_>,
    location: &PlaceUrn,
) -> Result<SessionUrn, DispatchError> {
    let candidate_sessions: Vec<SessionUrn> = ctx
        .world
        .sessions
        .values()
        .filter(|s| s.strategy == SessionStrategy::Combat && s.status != SessionStatus::Ended)
        .map(|s| s.urn.clone())
        .collect();

    let existing = candidate_sessions.into_iter().find(|session_urn| {
        ctx.world
            .actors
            .values()
            .any(|a| &a.location == location && a.sessions.contains_key(session_urn))
    });

    if let Some(urn) = existing {
        return Ok(urn);
    }

    let uid = ctx.uniqid();
    let urn: SessionUrn = format!("flux:session:combat:{uid}")
        .parse()
        .expect("generated session urn is always well-formed");

    let session = Session {
        urn: urn.clone(),
        strategy: SessionStrategy::Combat,
        status: SessionStatus::Pending,
        data: SessionData::Combat(CombatSessionData::default()),
        created_at: ctx.now(),
    };
    ctx.world.insert_session(session);

    ctx.declare_event(
        EventType::CombatSessionDidStart,
        flux_core::Urn::system_actor(),
        location.clone(),
        EventPayload::Session {
            session: urn.clone(),
        },
    );

    Ok(urn)
}

/// Adds `actor_id` to the combat session as a combatant on `team`, and
/// registers the session on the actor. No-op (besides returning
/// success) if the actor is already a combatant.
pub fn add_combatant(
    ctx: &mut TransformerContext<'_>,
    session_urn: &SessionUrn,
    actor_id: &ActorUrn,
    team: Team,
) -> Result<(), DispatchError> {
    let now = ctx.now();
    let session = ctx.world.session_mut(session_urn).ok_or_else(|| {
        DispatchError::declared(
            flux_core::ErrorCode::InvalidSession,
            ReducerPhase::Apply,
            "combat session does not exist",
        )
    })?;
    let data = session.as_combat_mut().ok_or_else(|| {
        DispatchError::declared(
            flux_core::ErrorCode::InvalidSession,
            ReducerPhase::Apply,
            "session is not a combat session",
        )
    })?;
    data.combatants
        .entry(actor_id.clone())
        .or_insert_with(|| flux_core::world::Combatant::new(actor_id.clone(), team));

    if let Some(actor) = ctx.world.actor_mut(actor_id) {
        actor.sessions.entry(session_urn.clone()).or_insert(now);
    }

    Ok(())
}

/// Rolls a fresh initiative order for the session: one `1d20` per
/// combatant, descending, ties broken by URN ordering for determinism.
pub fn roll_initiative(
    session_urn: &SessionUrn,
    ctx: &mut TransformerContext<'_>,
    rng: &mut dyn RandomSource,
) -> Result<(), DispatchError> {
    let actor_urns: Vec<ActorUrn> = {
        let session = ctx.world.session(session_urn).ok_or_else(|| {
            DispatchError::declared(
                flux_core::ErrorCode::InvalidSession,
                ReducerPhase::Apply,
                "combat session does not exist",
            )
        })?;
        let data = session.as_combat().ok_or_else(|| {
            DispatchError::declared(
                flux_core::ErrorCode::InvalidSession,
                ReducerPhase::Apply,
                "session is not a combat session",
            )
        })?;
        data.combatants.keys().cloned().collect()
    };

    let mut rolled: Vec<(u32, ActorUrn)> = actor_urns
        .into_iter()
        .map(|urn| (rng.roll_die(20), urn))
        .collect();
    rolled.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let session = ctx
        .world
        .session_mut(session_urn)
        .expect("session existed moments ago");
    let data = session.as_combat_mut().expect("checked above");
    data.initiative = rolled.into_iter().map(|(_, urn)| urn).collect();

    Ok(())
}

/// Checks whether the session has ended (a team has no living
/// combatants) and, if so, marks it ended and declares
/// `COMBAT_SESSION_DID_END`.
pub fn check_session_end(
    ctx: &mut TransformerContext<'_>,
    session_urn: &SessionUrn,
    location: &PlaceUrn,
) -> Result<(), DispatchError> {
    let Some((alpha_ids, bravo_ids, round, turn)) = (match ctx.world.session(session_urn) {
        Some(session) => session.as_combat().map(|data| {
            let alpha_ids: Vec<ActorUrn> = data.living_on_team(Team::Alpha).map(|c| c.actor.clone()).collect();
            let bravo_ids: Vec<ActorUrn> = data.living_on_team(Team::Bravo).map(|c| c.actor.clone()).collect();
            (alpha_ids, bravo_ids, data.round, data.turn)
        }),
        None => None,
    }) else {
        return Ok(());
    };

    let alpha_alive = alpha_ids
        .iter()
        .any(|urn| ctx.world.actor(urn).is_some_and(|a| a.is_alive()));
    let bravo_alive = bravo_ids
        .iter()
        .any(|urn| ctx.world.actor(urn).is_some_and(|a| a.is_alive()));

    let outcome = match (alpha_alive, bravo_alive) {
        (true, true) | (false, false) => None,
        (true, false) => Some((Team::Alpha, round, turn)),
        (false, true) => Some((Team::Bravo, round, turn)),
    };

    if let Some((winning_team, round, turn)) = outcome {
        if let Some(session) = ctx.world.session_mut(session_urn) {
            session.status = SessionStatus::Ended;
        }
        ctx.declare_event(
            EventType::CombatSessionDidEnd,
            flux_core::Urn::system_actor(),
            location.clone(),
            EventPayload::CombatEnded {
                session: session_urn.clone(),
                winning_team,
                final_round: round,
                final_turn: turn,
            },
        );
        tracing::info!(session = %session_urn, winner = %winning_team, "combat session ended");
    }

    Ok(())
}
