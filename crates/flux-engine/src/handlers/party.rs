//! PARTY_INVITE / PARTY_INVITE_ACCEPT / PARTY_INVITE_REJECT / PARTY_KICK /
//! PARTY_LEAVE / PARTY_DISBAND / PARTY_INSPECT (spec §4.5).

use flux_core::command::{CommandArgs, PartyInviteArgs, PartySelfArgs, PartyTargetArgs};
use flux_core::world::Group;
use flux_core::{Command, CommandType, ErrorCode, EventPayload, EventType, GroupUrn, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

fn forbidden(message: &'static str) -> DispatchError {
    DispatchError::declared(ErrorCode::Forbidden, ReducerPhase::PreValidate, message)
}

fn invalid_target(message: &'static str) -> DispatchError {
    DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, message)
}

pub struct PartyInviteHandler;

fn invite_args(command: &Command) -> &PartyInviteArgs {
    match &command.args {
        CommandArgs::PartyInvite(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for PartyInviteHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyInvite
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = invite_args(command);
        let invitee = ctx
            .world
            .actor(&args.invitee)
            .ok_or_else(|| invalid_target("invitee does not exist"))?;
        if invitee.location != command.location {
            return Err(invalid_target("invitee is not at the inviter's location"));
        }
        let inviter = ctx
            .world
            .actor(&command.actor)
            .ok_or_else(|| invalid_target("inviter does not exist"))?;
        if let Some(party) = &inviter.party {
            let group = ctx
                .world
                .group(party)
                .ok_or_else(|| invalid_target("inviter's party no longer exists"))?;
            if !group.is_owner(&command.actor) {
                return Err(forbidden("only the party owner may invite"));
            }
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let invitee = invite_args(command).invitee.clone();
        let existing_party = ctx.world.actor(&command.actor).and_then(|a| a.party.clone());

        let party_urn: GroupUrn = match existing_party {
            Some(party) => party,
            None => {
                let uid = ctx.uniqid();
                let urn: GroupUrn = format!("flux:group:party:{uid}")
                    .parse()
                    .expect("generated group urn is always well-formed");
                ctx.world.insert_group(Group::new_party(urn.clone(), command.actor.clone()));
                if let Some(actor) = ctx.world.actor_mut(&command.actor) {
                    actor.party = Some(urn.clone());
                }
                urn
            }
        };

        if let Some(group) = ctx.world.group_mut(&party_urn) {
            group.invitations.insert(invitee.clone(), ());
        }

        ctx.declare_event(
            EventType::ActorDidInviteToParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Party {
                party: party_urn,
                subject: Some(invitee),
            },
        );
        Ok(())
    }
}

fn self_args(command: &Command) -> &PartySelfArgs {
    match &command.args {
        CommandArgs::PartyInviteAccept(args)
        | CommandArgs::PartyInviteReject(args)
        | CommandArgs::PartyLeave(args)
        | CommandArgs::PartyDisband(args)
        | CommandArgs::PartyInspect(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

pub struct PartyInviteAcceptHandler;

impl CommandHandler for PartyInviteAcceptHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyInviteAccept
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = self_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.invitations.contains_key(&command.actor) {
            return Err(invalid_target("no pending invitation to this party"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let party = self_args(command).party.clone();
        if let Some(group) = ctx.world.group_mut(&party) {
            group.invitations.remove(&command.actor);
            group.members.insert(command.actor.clone(), ());
        }
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            actor.party = Some(party.clone());
        }
        ctx.declare_event(
            EventType::ActorDidJoinParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Party {
                party,
                subject: Some(command.actor.clone()),
            },
        );
        Ok(())
    }
}

pub struct PartyInviteRejectHandler;

impl CommandHandler for PartyInviteRejectHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyInviteReject
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = self_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.invitations.contains_key(&command.actor) {
            return Err(invalid_target("no pending invitation to this party"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let party = self_args(command).party.clone();
        if let Some(group) = ctx.world.group_mut(&party) {
            group.invitations.remove(&command.actor);
        }
        Ok(())
    }
}

pub struct PartyKickHandler;

fn target_args(command: &Command) -> &PartyTargetArgs {
    match &command.args {
        CommandArgs::PartyKick(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for PartyKickHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyKick
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = target_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.is_owner(&command.actor) {
            return Err(forbidden("only the party owner may kick members"));
        }
        if !group.is_member(&args.target) {
            return Err(invalid_target("target is not a party member"));
        }
        if group.is_owner(&args.target) {
            return Err(forbidden("the party owner cannot be kicked"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = target_args(command).clone();
        if let Some(group) = ctx.world.group_mut(&args.party) {
            group.members.remove(&args.target);
        }
        if let Some(actor) = ctx.world.actor_mut(&args.target) {
            actor.party = None;
        }
        ctx.declare_event(
            EventType::ActorDidLeaveParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Party {
                party: args.party,
                subject: Some(args.target),
            },
        );
        Ok(())
    }
}

pub struct PartyLeaveHandler;

impl CommandHandler for PartyLeaveHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyLeave
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = self_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.is_member(&command.actor) {
            return Err(invalid_target("actor is not a party member"));
        }
        if group.is_owner(&command.actor) {
            return Err(forbidden("the party owner cannot leave; disband instead"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let party = self_args(command).party.clone();
        if let Some(group) = ctx.world.group_mut(&party) {
            group.members.remove(&command.actor);
        }
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            actor.party = None;
        }
        ctx.declare_event(
            EventType::ActorDidLeaveParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Party {
                party,
                subject: Some(command.actor.clone()),
            },
        );
        Ok(())
    }
}

pub struct PartyDisbandHandler;

impl CommandHandler for PartyDisbandHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyDisband
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = self_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.is_owner(&command.actor) {
            return Err(forbidden("only the party owner may disband the party"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let party = self_args(command).party.clone();
        let member_ids: Vec<_> = ctx
            .world
            .group(&party)
            .map(|g| g.members.keys().cloned().collect())
            .unwrap_or_default();
        for member in &member_ids {
            if let Some(actor) = ctx.world.actor_mut(member) {
                actor.party = None;
            }
        }
        ctx.world.groups.remove(&party);
        ctx.declare_event(
            EventType::ActorDidLeaveParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Party { party, subject: None },
        );
        Ok(())
    }
}

pub struct PartyInspectHandler;

impl CommandHandler for PartyInspectHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PartyInspect
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = self_args(command);
        let group = ctx
            .world
            .group(&args.party)
            .ok_or_else(|| invalid_target("party does not exist"))?;
        if !group.is_member(&command.actor) {
            return Err(forbidden("only party members may inspect the party"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let party = self_args(command).party.clone();
        let group = ctx.world.group(&party).expect("checked in pre_validate");
        let is_owner = group.is_owner(&command.actor);
        let members: Vec<_> = group.members.keys().cloned().collect();
        let owner = group.owner.clone();
        let invitations = is_owner.then(|| group.invitations.keys().cloned().collect());

        ctx.declare_event(
            EventType::ActorDidInspectParty,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::PartyInspected {
                party,
                owner,
                members,
                invitations,
            },
        );
        Ok(())
    }
}
