//! MATERIALIZE_ACTOR / DEMATERIALIZE_ACTOR / LOOK (spec §4.5).

use flux_core::world::{PresenceEntry, Visibility};
use flux_core::{Command, CommandType, ErrorCode, EventPayload, EventType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

pub struct MaterializeActorHandler;

impl CommandHandler for MaterializeActorHandler {
    fn command_type(&self) -> CommandType {
        CommandType::MaterializeActor
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if ctx.world.place(&command.location).is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "place does not exist",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        if let Some(place) = ctx.world.place_mut(&command.location) {
            place.entities.insert(
                command.actor.clone(),
                PresenceEntry {
                    visibility: Visibility::VisibleToEveryone,
                },
            );
        }
        ctx.declare_event(
            EventType::ActorDidMaterialize,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Presence {
                place: command.location.clone(),
            },
        );
        ctx.declare_event(
            EventType::ActorDidLook,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Presence {
                place: command.location.clone(),
            },
        );
        Ok(())
    }
}

pub struct DematerializeActorHandler;

impl CommandHandler for DematerializeActorHandler {
    fn command_type(&self) -> CommandType {
        CommandType::DematerializeActor
    }

    fn pre_validate(&self, _command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        if let Some(place) = ctx.world.place_mut(&command.location) {
            place.entities.remove(&command.actor);
        }
        ctx.declare_event(
            EventType::ActorDidDematerialize,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Presence {
                place: command.location.clone(),
            },
        );
        Ok(())
    }
}

pub struct LookHandler;

impl CommandHandler for LookHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Look
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if ctx.world.place(&command.location).is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "place does not exist",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        ctx.declare_event(
            EventType::ActorDidLook,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Presence {
                place: command.location.clone(),
            },
        );
        Ok(())
    }
}

pub struct WaitHandler;

impl CommandHandler for WaitHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Wait
    }

    fn pre_validate(&self, _command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }

    fn apply(&self, _command: &Command, _ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }
}

pub struct InspectHandler;

impl CommandHandler for InspectHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Inspect
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        if ctx.world.actor(&command.actor).is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "actor does not exist",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        ctx.declare_event(
            EventType::ActorDidLook,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::None,
        );
        Ok(())
    }
}
