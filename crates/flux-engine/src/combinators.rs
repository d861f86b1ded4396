//! Reducer combinators: composable `CommandHandler` wrappers.
//!
//! Spec's redesign note asks for named, reusable validation wrappers
//! instead of each handler re-deriving the same checks. Grounded in the
//! teacher's `PostExecutionHook` chain-of-responsibility
//! (`runtime::hooks`, `HookRegistry`): there, independent hooks compose
//! by priority and can chain into each other. Here composition is
//! simpler (decorators wrap one inner handler rather than triggering
//! siblings), but the goal is the same: pull the repeated checks out of
//! the per-command reducer.

use flux_core::error::ErrorContext;
use flux_core::{Command, CommandType, ErrorCode, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

/// Wraps `inner`, rejecting dispatch if the registry somehow invoked it
/// for the wrong command type. A defensive check, not a validation rule
/// a content author would ever hit.
pub struct WithCommandType<H> {
    expected: CommandType,
    inner: H,
}

pub fn with_command_type<H: CommandHandler>(expected: CommandType, inner: H) -> WithCommandType<H> {
    WithCommandType { expected, inner }
}

impl<H: CommandHandler> CommandHandler for WithCommandType<H> {
    fn command_type(&self) -> CommandType {
        self.expected
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if command.command_type() != self.expected {
            return Err(DispatchError::declared(
                ErrorCode::InvalidAction,
                ReducerPhase::PreValidate,
                "command routed to the wrong handler",
            ));
        }
        self.inner.pre_validate(command, ctx)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.apply(command, ctx)
    }

    fn post_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.post_validate(command, ctx)
    }
}

/// Wraps `inner`, rejecting dispatch unless the issuing actor exists in
/// the world and is alive. Almost every command needs this; pulling it
/// out means individual reducers only check what is specific to them.
pub struct WithBasicWorldStateValidation<H> {
    inner: H,
}

pub fn with_basic_world_state_validation<H: CommandHandler>(inner: H) -> WithBasicWorldStateValidation<H> {
    WithBasicWorldStateValidation { inner }
}

impl<H: CommandHandler> CommandHandler for WithBasicWorldStateValidation<H> {
    fn command_type(&self) -> CommandType {
        self.inner.command_type()
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if !command.is_system() {
            let actor = ctx.world.actor(&command.actor).ok_or_else(|| {
                DispatchError::declared_with(
                    ErrorCode::InvalidTarget,
                    ReducerPhase::PreValidate,
                    "issuing actor does not exist",
                    ErrorContext::new().with_actor(command.actor.clone()),
                )
            })?;
            if !actor.is_alive() {
                return Err(DispatchError::declared_with(
                    ErrorCode::PreconditionFailed,
                    ReducerPhase::PreValidate,
                    "issuing actor is not alive",
                    ErrorContext::new().with_actor(command.actor.clone()),
                ));
            }
        }
        self.inner.pre_validate(command, ctx)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.apply(command, ctx)
    }

    fn post_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.post_validate(command, ctx)
    }
}

/// Wraps `inner`, rejecting dispatch unless `command.session` names an
/// existing, still-pending-or-running workbench session (spec §4.6).
pub struct WithExistingWorkbenchSession<H> {
    inner: H,
}

pub fn with_existing_workbench_session<H: CommandHandler>(inner: H) -> WithExistingWorkbenchSession<H> {
    WithExistingWorkbenchSession { inner }
}

impl<H: CommandHandler> CommandHandler for WithExistingWorkbenchSession<H> {
    fn command_type(&self) -> CommandType {
        self.inner.command_type()
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = command.session.as_ref().ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "command requires an active workbench session",
            )
        })?;
        let session = ctx.world.session(session_urn).ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "workbench session does not exist",
            )
        })?;
        if session.as_workbench().is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "session is not a workbench session",
            ));
        }
        if session.status == flux_core::world::SessionStatus::Ended {
            return Err(DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "workbench session has already ended",
            ));
        }
        self.inner.pre_validate(command, ctx)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.apply(command, ctx)
    }

    fn post_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.post_validate(command, ctx)
    }
}

/// Wraps `inner`, rejecting dispatch unless the workbench session's
/// target actor has a current shell equipped. `WORKBENCH_SHELL_RENAME`
/// and the `STAGE_MUTATION` family all need this; `USE_WORKBENCH` itself
/// does not (it is what puts the actor into the session in the first
/// place), so it does not wear this combinator.
pub struct WithWorkbenchShell<H> {
    inner: H,
}

pub fn with_workbench_shell<H: CommandHandler>(inner: H) -> WithWorkbenchShell<H> {
    WithWorkbenchShell { inner }
}

impl<H: CommandHandler> CommandHandler for WithWorkbenchShell<H> {
    fn command_type(&self) -> CommandType {
        self.inner.command_type()
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = command.session.as_ref().ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "command requires an active workbench session",
            )
        })?;
        let session = ctx.world.session(session_urn).ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "workbench session does not exist",
            )
        })?;
        let data = session.as_workbench().ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::PreValidate,
                "session is not a workbench session",
            )
        })?;
        let actor = ctx.world.actor(&data.actor_id).ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "workbench session's actor does not exist",
            )
        })?;
        if actor.current_shell().is_none() {
            return Err(DispatchError::declared(
                ErrorCode::PreconditionFailed,
                ReducerPhase::PreValidate,
                "actor has no shell equipped to mutate",
            ));
        }
        self.inner.pre_validate(command, ctx)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.apply(command, ctx)
    }

    fn post_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.post_validate(command, ctx)
    }
}

/// Wraps `inner`, deducting a fixed action-point cost from the acting
/// combatant before delegating to `apply`. Declares
/// `INSUFFICIENT_RESOURCES` and skips `inner.apply` entirely if the
/// combatant cannot afford it — the world is left untouched.
pub struct WithCombatCost<H> {
    cost: i64,
    inner: H,
}

pub fn with_combat_cost<H: CommandHandler>(cost: i64, inner: H) -> WithCombatCost<H> {
    WithCombatCost { cost, inner }
}

impl<H: CommandHandler> CommandHandler for WithCombatCost<H> {
    fn command_type(&self) -> CommandType {
        self.inner.command_type()
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.pre_validate(command, ctx)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_urn = command.session.as_ref().ok_or_else(|| {
            DispatchError::declared(
                ErrorCode::InvalidSession,
                ReducerPhase::Apply,
                "combat command requires an active combat session",
            )
        })?.clone();

        {
            let session = ctx.world.session_mut(&session_urn).ok_or_else(|| {
                DispatchError::declared(
                    ErrorCode::InvalidSession,
                    ReducerPhase::Apply,
                    "combat session does not exist",
                )
            })?;
            let data = session.as_combat_mut().ok_or_else(|| {
                DispatchError::declared(
                    ErrorCode::InvalidSession,
                    ReducerPhase::Apply,
                    "session is not a combat session",
                )
            })?;
            let combatant = data.combatants.get_mut(&command.actor).ok_or_else(|| {
                DispatchError::declared(
                    ErrorCode::InvalidTarget,
                    ReducerPhase::Apply,
                    "actor is not a combatant in this session",
                )
            })?;
            if combatant.action_points < self.cost {
                return Err(DispatchError::declared(
                    ErrorCode::InsufficientResources,
                    ReducerPhase::Apply,
                    "not enough action points",
                ));
            }
            combatant.action_points -= self.cost;
        }

        self.inner.apply(command, ctx)
    }

    fn post_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        self.inner.post_validate(command, ctx)
    }
}
