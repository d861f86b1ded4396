//! CREATE_ACTOR / CREATE_PLACE / DESTROY_ACTOR / DESTROY_PLACE /
//! MUTATE_WEATHER / MUTATE_RESOURCES (spec §4.5). All are system commands:
//! only the reserved SYSTEM actor may issue them.

use flux_core::command::{CommandArgs, CreateActorArgs, CreatePlaceArgs, DestroyEntityArgs, MutateResourcesArgs, MutateWeatherArgs};
use flux_core::world::{Actor, Place};
use flux_core::{Command, CommandType, ErrorCode, EventPayload, EventType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

fn require_system(command: &Command) -> Result<(), DispatchError> {
    if !command.is_system() {
        return Err(DispatchError::declared(
            ErrorCode::Forbidden,
            ReducerPhase::PreValidate,
            "only the system actor may issue this command",
        ));
    }
    Ok(())
}

pub struct CreateActorHandler;

fn create_actor_args(command: &Command) -> &CreateActorArgs {
    match &command.args {
        CommandArgs::CreateActor(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for CreateActorHandler {
    fn command_type(&self) -> CommandType {
        CommandType::CreateActor
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        let args = create_actor_args(command);
        if ctx.world.actor(&args.urn).is_some() {
            return Err(DispatchError::declared(ErrorCode::InvalidArgument, ReducerPhase::PreValidate, "actor urn is already in use"));
        }
        if ctx.world.place(&args.location).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "initial location does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = create_actor_args(command).clone();
        ctx.world.insert_actor(Actor::new_npc(args.urn, args.name, args.location, 10));
        Ok(())
    }
}

pub struct CreatePlaceHandler;

fn create_place_args(command: &Command) -> &CreatePlaceArgs {
    match &command.args {
        CommandArgs::CreatePlace(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for CreatePlaceHandler {
    fn command_type(&self) -> CommandType {
        CommandType::CreatePlace
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        let args = create_place_args(command);
        if ctx.world.place(&args.urn).is_some() {
            return Err(DispatchError::declared(ErrorCode::InvalidArgument, ReducerPhase::PreValidate, "place urn is already in use"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = create_place_args(command).clone();
        ctx.world.insert_place(Place::new(args.urn, args.name));
        Ok(())
    }
}

fn destroy_args(command: &Command) -> &DestroyEntityArgs {
    match &command.args {
        CommandArgs::DestroyActor(args) | CommandArgs::DestroyPlace(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

pub struct DestroyActorHandler;

impl CommandHandler for DestroyActorHandler {
    fn command_type(&self) -> CommandType {
        CommandType::DestroyActor
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        let urn = &destroy_args(command).urn;
        if ctx.world.actor(urn).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "actor does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let urn = destroy_args(command).urn.clone();
        if let Some(actor) = ctx.world.actors.remove(&urn) {
            if let Some(place) = ctx.world.place_mut(&actor.location) {
                place.entities.remove(&urn);
            }
        }
        Ok(())
    }
}

pub struct DestroyPlaceHandler;

impl CommandHandler for DestroyPlaceHandler {
    fn command_type(&self) -> CommandType {
        CommandType::DestroyPlace
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        let urn = &destroy_args(command).urn;
        let place = ctx.world.place(urn).ok_or_else(|| {
            DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "place does not exist")
        })?;
        if !place.entities.is_empty() {
            return Err(DispatchError::declared(
                ErrorCode::PreconditionFailed,
                ReducerPhase::PreValidate,
                "place still has actors present",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let urn = destroy_args(command).urn.clone();
        ctx.world.places.remove(&urn);
        Ok(())
    }
}

pub struct MutateWeatherHandler;

fn weather_args(command: &Command) -> &MutateWeatherArgs {
    match &command.args {
        CommandArgs::MutateWeather(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for MutateWeatherHandler {
    fn command_type(&self) -> CommandType {
        CommandType::MutateWeather
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        if ctx.world.place(&weather_args(command).place).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "place does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = weather_args(command).clone();
        if let Some(place) = ctx.world.place_mut(&args.place) {
            place.weather = args.weather;
        }
        ctx.declare_event(
            EventType::PlaceWeatherDidChange,
            command.actor.clone(),
            args.place.clone(),
            EventPayload::Weather { place: args.place },
        );
        Ok(())
    }
}

pub struct MutateResourcesHandler;

fn resource_args(command: &Command) -> &MutateResourcesArgs {
    match &command.args {
        CommandArgs::MutateResources(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for MutateResourcesHandler {
    fn command_type(&self) -> CommandType {
        CommandType::MutateResources
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        require_system(command)?;
        if ctx.world.place(&resource_args(command).place).is_none() {
            return Err(DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, "place does not exist"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = resource_args(command).clone();
        if let Some(place) = ctx.world.place_mut(&args.place) {
            *place.resources.entry(args.resource.clone()).or_insert(0) += args.delta;
        }
        ctx.declare_event(
            EventType::PlaceResourceDidChange,
            command.actor.clone(),
            args.place.clone(),
            EventPayload::Resource {
                place: args.place,
                resource: args.resource,
                delta: args.delta,
            },
        );
        Ok(())
    }
}
