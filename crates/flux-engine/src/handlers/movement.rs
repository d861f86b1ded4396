//! MOVE (spec §4.5).

use flux_core::command::{CommandArgs, MoveArgs};
use flux_core::error::ErrorContext;
use flux_core::{Command, CommandType, ErrorCode, EventPayload, EventType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

pub struct MoveHandler;

fn args(command: &Command) -> &MoveArgs {
    match &command.args {
        CommandArgs::Move(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for MoveHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Move
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = args(command);
        let origin = ctx.world.place(&command.location).ok_or_else(|| {
            DispatchError::declared_with(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "actor's current place does not exist",
                ErrorContext::new().with_location(command.location.clone()),
            )
        })?;
        let _destination = ctx.world.place(&args.dest).ok_or_else(|| {
            DispatchError::declared_with(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "destination place does not exist",
                ErrorContext::new().with_location(args.dest.clone()),
            )
        })?;
        if origin.exit_to(&args.dest).is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidAction,
                ReducerPhase::PreValidate,
                "no exit from origin leads to destination",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = args(command);
        ctx.world.relocate_actor(&command.actor, &command.location, &args.dest);
        ctx.declare_event(
            EventType::ActorDidMove,
            command.actor.clone(),
            args.dest.clone(),
            EventPayload::Move {
                from: command.location.clone(),
                to: args.dest.clone(),
            },
        );
        Ok(())
    }
}
