//! STRIKE / CLEAVE / ATTACK / DEFEND / ADVANCE / RETREAT / TARGET /
//! COMBAT_SESSION_END (spec §4.5, §4.6).
//!
//! Every handler here acquires-or-creates the combat session at the
//! actor's location itself rather than relying on `command.session`,
//! since combat commands are issued without a pre-resolved session the
//! way workbench commands are.

use flux_core::command::{AdvanceArgs, AdvanceKind, AttackArgs, CommandArgs, RetreatArgs, TargetArgs};
use flux_core::dice::{roll_attack, RollModifier};
use flux_core::world::{SessionStatus, Team};
use flux_core::{config, ActorUrn, Command, CommandType, ErrorCode, EventPayload, EventType, SessionUrn, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;
use crate::session::combat::{acquire_or_create_combat_session, add_combatant, check_session_end};

fn ensure_combatants(
    ctx: &mut TransformerContext<'_>,
    command: &Command,
    opponent: Option<&ActorUrn>,
) -> Result<SessionUrn, DispatchError> {
    let session_urn = acquire_or_create_combat_session(ctx, &command.location)?;
    add_combatant(ctx, &session_urn, &command.actor, Team::Bravo)?;
    if let Some(target) = opponent {
        add_combatant(ctx, &session_urn, target, Team::Alpha)?;
    }
    Ok(session_urn)
}

fn spend_action_points(ctx: &mut TransformerContext<'_>, session_urn: &SessionUrn, actor: &ActorUrn, cost: i64) -> Result<(), DispatchError> {
    let session = ctx.world.session_mut(session_urn).ok_or_else(|| {
        DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::Apply, "combat session does not exist")
    })?;
    let data = session.as_combat_mut().ok_or_else(|| {
        DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::Apply, "session is not a combat session")
    })?;
    let combatant = data.combatants.get_mut(actor).ok_or_else(|| {
        DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::Apply, "actor is not a combatant in this session")
    })?;
    if combatant.action_points < cost {
        return Err(DispatchError::declared(ErrorCode::InsufficientResources, ReducerPhase::Apply, "not enough action points"));
    }
    combatant.action_points -= cost;
    Ok(())
}

fn resolve_attack(
    ctx: &mut TransformerContext<'_>,
    command: &Command,
    session_urn: &SessionUrn,
    target: &ActorUrn,
    event_type: EventType,
) -> Result<(), DispatchError> {
    let effective_skill_rank = ctx.world.actor(&command.actor).map(|a| a.effective_skill_rank("melee")).unwrap_or(0);
    let modifiers: Vec<RollModifier> = Vec::new();
    let damage = roll_attack(config::DEFAULT_WEAPON_DICE, effective_skill_rank, &modifiers, ctx.rng())
        .map_err(|_| DispatchError::declared(ErrorCode::InvalidArgument, ReducerPhase::Apply, "weapon dice spec is malformed"))?;
    let hit = damage > 0;

    if hit {
        if let Some(victim) = ctx.world.actor_mut(target) {
            victim.hp.apply_delta(-damage);
        }
    }

    ctx.declare_event(
        event_type,
        command.actor.clone(),
        command.location.clone(),
        EventPayload::Attack {
            target: target.clone(),
            roll: damage,
            damage,
            hit,
        },
    );
    ctx.declare_event(
        EventType::CombatantWasAttacked,
        target.clone(),
        command.location.clone(),
        EventPayload::Attack {
            target: target.clone(),
            roll: damage,
            damage,
            hit,
        },
    );

    let died = ctx.world.actor(target).is_some_and(|a| !a.is_alive());
    if died {
        ctx.declare_event(
            EventType::CombatantDidDie,
            target.clone(),
            command.location.clone(),
            EventPayload::Died {
                killer: Some(command.actor.clone()),
            },
        );
    }

    check_session_end(ctx, session_urn, &command.location)
}

pub struct StrikeHandler;

fn attack_args(command: &Command) -> &AttackArgs {
    match &command.args {
        CommandArgs::Strike(args) | CommandArgs::Cleave(args) | CommandArgs::Attack(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for StrikeHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Strike
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = attack_args(command);
        let target = ctx.world.actor(&args.target).ok_or_else(|| {
            DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "strike target does not exist")
        })?;
        if !target.is_alive() {
            return Err(DispatchError::declared(ErrorCode::PreconditionFailed, ReducerPhase::PreValidate, "strike target is already dead"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let target = attack_args(command).target.clone();
        let session_urn = ensure_combatants(ctx, command, Some(&target))?;
        spend_action_points(ctx, &session_urn, &command.actor, config::STRIKE_AP_COST)?;
        resolve_attack(ctx, command, &session_urn, &target, EventType::CombatantDidAttack)
    }
}

pub struct CleaveHandler;

impl CommandHandler for CleaveHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Cleave
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = attack_args(command);
        if ctx.world.actor(&args.target).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "cleave target does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let primary_target = attack_args(command).target.clone();
        let session_urn = ensure_combatants(ctx, command, Some(&primary_target))?;
        spend_action_points(ctx, &session_urn, &command.actor, config::CLEAVE_AP_COST)?;

        let opposing: Vec<ActorUrn> = ctx
            .world
            .session(&session_urn)
            .and_then(|s| s.as_combat())
            .map(|data| data.living_on_team(Team::Alpha).map(|c| c.actor.clone()).collect())
            .unwrap_or_default();

        for victim in &opposing {
            resolve_attack(ctx, command, &session_urn, victim, EventType::CombatantDidAttack)?;
        }
        Ok(())
    }
}

pub struct AttackHandler;

impl CommandHandler for AttackHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Attack
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = attack_args(command);
        let target = ctx.world.actor(&args.target).ok_or_else(|| {
            DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "attack target does not exist")
        })?;
        if !target.is_alive() {
            return Err(DispatchError::declared(ErrorCode::PreconditionFailed, ReducerPhase::PreValidate, "attack target is already dead"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let target = attack_args(command).target.clone();
        let session_urn = ensure_combatants(ctx, command, Some(&target))?;
        spend_action_points(ctx, &session_urn, &command.actor, config::ATTACK_AP_COST)?;
        resolve_attack(ctx, command, &session_urn, &target, EventType::CombatantDidAttack)
    }
}

pub struct DefendHandler;

impl CommandHandler for DefendHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Defend
    }

    fn pre_validate(&self, _command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = ensure_combatants(ctx, command, None)?;
        spend_action_points(ctx, &session_urn, &command.actor, config::DEFEND_AP_COST)?;
        ctx.declare_event(EventType::CombatantDidDefend, command.actor.clone(), command.location.clone(), EventPayload::None);
        Ok(())
    }
}

pub struct AdvanceHandler;

fn advance_args(command: &Command) -> &AdvanceArgs {
    match &command.args {
        CommandArgs::Advance(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for AdvanceHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Advance
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if let AdvanceKind::CloseOnTarget = advance_args(command).kind {
            let session_urn = command.session.clone();
            if let Some(session_urn) = session_urn {
                let has_target = ctx
                    .world
                    .session(&session_urn)
                    .and_then(|s| s.as_combat())
                    .and_then(|d| d.combatants.get(&command.actor))
                    .is_some_and(|c| c.target.is_some());
                if !has_target {
                    return Err(DispatchError::declared(ErrorCode::PreconditionFailed, ReducerPhase::PreValidate, "no target acquired to close on"));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = ensure_combatants(ctx, command, None)?;
        spend_action_points(ctx, &session_urn, &command.actor, config::ADVANCE_AP_COST)
    }
}

pub struct RetreatHandler;

fn retreat_args(command: &Command) -> &RetreatArgs {
    match &command.args {
        CommandArgs::Retreat(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for RetreatHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Retreat
    }

    fn pre_validate(&self, command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if retreat_args(command).distance <= 0 {
            return Err(DispatchError::declared(ErrorCode::InvalidArgument, ReducerPhase::PreValidate, "retreat distance must be positive"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = ensure_combatants(ctx, command, None)?;
        spend_action_points(ctx, &session_urn, &command.actor, config::RETREAT_AP_COST)
    }
}

pub struct TargetHandler;

fn target_args(command: &Command) -> &TargetArgs {
    match &command.args {
        CommandArgs::Target(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for TargetHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Target
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if ctx.world.actor(&target_args(command).target).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "target does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let target = target_args(command).target.clone();
        let session_urn = ensure_combatants(ctx, command, Some(&target))?;
        spend_action_points(ctx, &session_urn, &command.actor, config::TARGET_AP_COST)?;

        if let Some(session) = ctx.world.session_mut(&session_urn) {
            if let Some(data) = session.as_combat_mut() {
                if let Some(combatant) = data.combatants.get_mut(&command.actor) {
                    combatant.target = Some(target.clone());
                }
            }
        }

        ctx.declare_event(EventType::CombatantDidAcquireTarget, command.actor.clone(), command.location.clone(), EventPayload::None);
        Ok(())
    }
}

pub struct CombatSessionEndHandler;

impl CommandHandler for CombatSessionEndHandler {
    fn command_type(&self) -> CommandType {
        CommandType::CombatSessionEnd
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = command.session.as_ref().ok_or_else(|| {
            DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::PreValidate, "command requires an active combat session")
        })?;
        let session = ctx.world.session(session_urn).ok_or_else(|| {
            DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::PreValidate, "combat session does not exist")
        })?;
        if session.as_combat().is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::PreValidate, "session is not a combat session"));
        }
        if session.status == SessionStatus::Ended {
            return Err(DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::PreValidate, "combat session has already ended"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = command.session.clone().expect("checked in pre_validate");

        let (round, turn, alpha_alive, bravo_alive) = {
            let data = ctx.world.session(&session_urn).and_then(|s| s.as_combat()).expect("checked in pre_validate");
            let alpha_ids: Vec<ActorUrn> = data.living_on_team(Team::Alpha).map(|c| c.actor.clone()).collect();
            let bravo_ids: Vec<ActorUrn> = data.living_on_team(Team::Bravo).map(|c| c.actor.clone()).collect();
            let alpha_alive = alpha_ids.iter().any(|urn| ctx.world.actor(urn).is_some_and(|a| a.is_alive()));
            let bravo_alive = bravo_ids.iter().any(|urn| ctx.world.actor(urn).is_some_and(|a| a.is_alive()));
            (data.round, data.turn, alpha_alive, bravo_alive)
        };

        let winning_team = match (alpha_alive, bravo_alive) {
            (true, false) => Team::Alpha,
            (false, true) => Team::Bravo,
            _ => Team::Alpha,
        };

        if let Some(session) = ctx.world.session_mut(&session_urn) {
            session.status = SessionStatus::Ended;
        }

        ctx.declare_event(
            EventType::CombatSessionDidEnd,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::CombatEnded {
                session: session_urn,
                winning_team,
                final_round: round,
                final_turn: turn,
            },
        );
        Ok(())
    }
}
