//! Command handler registry and the three-phase dispatch pipeline.
//!
//! Grounded in the teacher's `ProviderRegistry` (kind-keyed `HashMap` of
//! boxed trait objects, `runtime::api::registry`) for registration, and
//! its `drive_transition` / `GameEngine::execute` three-phase pipeline
//! (`game/core::engine::transition`) for dispatch: every command runs
//! `pre_validate` -> `apply` -> `post_validate`, each phase able to fail
//! independently.

use std::collections::HashMap;

use flux_core::{Command, CommandType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};

/// A reducer for exactly one [`CommandType`]. Implementations read
/// `ctx.world` during validation and mutate it (plus declare events or
/// errors) during `apply`.
pub trait CommandHandler: Send + Sync {
    /// The command type this handler answers for. Must match the key it
    /// is registered under; the registry double-checks this at dispatch
    /// time via [`crate::combinators::with_command_type`].
    fn command_type(&self) -> CommandType;

    /// Checks preconditions against the world as it stood before this
    /// command. Must not mutate `ctx`.
    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError>;

    /// Mutates the world and declares events/errors.
    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError>;

    /// Checks invariants after `apply`. Default accepts.
    fn post_validate(&self, _command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// Registry mapping each [`CommandType`] to the handler that reduces it.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<CommandType, Box<dyn CommandHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under its own `command_type()`. Replaces any
    /// handler already registered for that type.
    pub fn register(&mut self, handler: impl CommandHandler + 'static) {
        self.handlers.insert(handler.command_type(), Box::new(handler));
    }

    pub fn get(&self, command_type: CommandType) -> Option<&dyn CommandHandler> {
        self.handlers.get(&command_type).map(|boxed| &**boxed)
    }

    pub fn has(&self, command_type: CommandType) -> bool {
        self.handlers.contains_key(&command_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Stateless driver of the three-phase reducer contract. Holds no data
/// of its own; exists so `dispatch` reads as a verb at call sites.
pub struct Dispatcher;

impl Dispatcher {
    /// Looks up the handler for `command.command_type()` and runs it
    /// through `pre_validate -> apply -> post_validate`. Any phase
    /// failing aborts the remaining phases; `apply` is only reached if
    /// `pre_validate` succeeded, so a failing `pre_validate` never
    /// mutates the world.
    pub fn dispatch(
        registry: &HandlerRegistry,
        command: &Command,
        ctx: &mut TransformerContext<'_>,
    ) -> Result<(), DispatchError> {
        let command_type = command.command_type();
        let handler = registry
            .get(command_type)
            .ok_or(DispatchError::NoHandler { command_type })?;

        tracing::debug!(
            command_type = %command_type,
            trace = %command.id,
            actor = %command.actor,
            "dispatching command"
        );

        handler.pre_validate(command, ctx).map_err(|e| {
            tracing::warn!(command_type = %command_type, phase = ReducerPhase::PreValidate.as_str(), error = %e, "pre_validate failed");
            e
        })?;
        handler.apply(command, ctx).map_err(|e| {
            tracing::error!(command_type = %command_type, phase = ReducerPhase::Apply.as_str(), error = %e, "apply failed");
            e
        })?;
        handler.post_validate(command, ctx).map_err(|e| {
            tracing::error!(command_type = %command_type, phase = ReducerPhase::PostValidate.as_str(), error = %e, "post_validate failed");
            e
        })?;

        Ok(())
    }
}
