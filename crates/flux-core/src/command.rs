//! The typed, validated instruction a resolver lifts an [`Intent`] into.
//!
//! `CommandArgs` is the single sum type spec.md §9 calls for in place of
//! "open-ended tagged commands": one variant per command family, each
//! carrying its own argument record. `CommandType` is generated as the
//! discriminant so the registry can dispatch by tag without matching on
//! the full payload (teacher idiom: `strum::EnumDiscriminants`, used the
//! same way `game-core::ActionKind` discriminates `Action` payloads).

use crate::ids::Id;
use crate::intent::IntentId;
use crate::urn::{ActorUrn, GroupUrn, ItemUrn, PlaceUrn, SchemaUrn, SessionUrn};
use crate::world::{AnatomySlot, ShellMutation};
use crate::world::Tick;

pub type CommandId = Id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveArgs {
    pub dest: PlaceUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyInviteArgs {
    pub invitee: ActorUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyTargetArgs {
    pub party: GroupUrn,
    pub target: ActorUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartySelfArgs {
    pub party: GroupUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditArgs {
    pub recipient: ActorUrn,
    pub currency: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseWorkbenchArgs {
    pub session_id: Option<SessionUrn>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbenchShellRenameArgs {
    pub new_name: String,
    pub shell_name_or_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbenchStageMutationArgs {
    pub session_id: SessionUrn,
    pub mutation: ShellMutation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbenchSessionArgs {
    pub session_id: SessionUrn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceKind {
    Distance { distance: i64, direction: i64 },
    CloseOnTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvanceArgs {
    pub kind: AdvanceKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetreatArgs {
    pub distance: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetArgs {
    pub target: ActorUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackArgs {
    pub target: ActorUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquipArgs {
    pub item: ItemUrn,
    pub slot: AnatomySlot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnequipArgs {
    pub slot: AnatomySlot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemTransferArgs {
    pub item: ItemUrn,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GiveTakeItemArgs {
    pub other: ActorUrn,
    pub item: ItemUrn,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateActorArgs {
    pub urn: ActorUrn,
    pub name: String,
    pub location: PlaceUrn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatePlaceArgs {
    pub urn: PlaceUrn,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestroyEntityArgs {
    pub urn: crate::urn::Urn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutateWeatherArgs {
    pub place: PlaceUrn,
    pub weather: crate::world::Weather,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutateResourcesArgs {
    pub place: PlaceUrn,
    pub resource: String,
    pub delta: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbenchCommitSchemaArgs {
    pub session_id: SessionUrn,
    pub schema: Option<SchemaUrn>,
}

/// The tagged union of every command family. One variant per member of
/// `CommandType`; `CommandType` itself is derived below.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(CommandType),
    derive(Hash, strum::Display, strum::EnumString),
    strum(serialize_all = "SCREAMING_SNAKE_CASE")
)]
pub enum CommandArgs {
    Move(MoveArgs),
    MaterializeActor,
    DematerializeActor,
    Look,
    Wait,
    Inspect,

    PartyInvite(PartyInviteArgs),
    PartyInviteAccept(PartySelfArgs),
    PartyInviteReject(PartySelfArgs),
    PartyKick(PartyTargetArgs),
    PartyLeave(PartySelfArgs),
    PartyDisband(PartySelfArgs),
    PartyInspect(PartySelfArgs),

    Credit(CreditArgs),

    UseWorkbench(UseWorkbenchArgs),
    WorkbenchShellRename(WorkbenchShellRenameArgs),
    WorkbenchStageMutation(WorkbenchStageMutationArgs),
    WorkbenchPreview(WorkbenchSessionArgs),
    WorkbenchCost(WorkbenchSessionArgs),
    WorkbenchCommit(WorkbenchCommitSchemaArgs),
    WorkbenchAbandon(WorkbenchSessionArgs),

    Strike(AttackArgs),
    Cleave(AttackArgs),
    Attack(AttackArgs),
    Defend,
    Advance(AdvanceArgs),
    Retreat(RetreatArgs),
    Target(TargetArgs),
    CombatSessionEnd,

    EquipItem(EquipArgs),
    UnequipItem(UnequipArgs),
    DropItem(ItemTransferArgs),
    PickupItem(ItemTransferArgs),
    GiveItem(GiveTakeItemArgs),
    TakeItem(GiveTakeItemArgs),

    CreateActor(CreateActorArgs),
    CreatePlace(CreatePlaceArgs),
    DestroyActor(DestroyEntityArgs),
    DestroyPlace(DestroyEntityArgs),
    MutateWeather(MutateWeatherArgs),
    MutateResources(MutateResourcesArgs),
}

impl CommandArgs {
    pub fn command_type(&self) -> CommandType {
        CommandType::from(self)
    }
}

/// A typed, validated instruction. `id` carries the issuing intent's id
/// as the trace threaded through every event/error this command produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub ts: Tick,
    pub actor: ActorUrn,
    pub location: PlaceUrn,
    pub session: Option<SessionUrn>,
    pub args: CommandArgs,
}

impl Command {
    pub fn new(
        trace: IntentId,
        ts: Tick,
        actor: ActorUrn,
        location: PlaceUrn,
        session: Option<SessionUrn>,
        args: CommandArgs,
    ) -> Self {
        Self {
            id: CommandId::new(trace.as_str()),
            ts,
            actor,
            location,
            session,
            args,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.args.command_type()
    }

    pub fn is_system(&self) -> bool {
        self.actor.is_system_actor()
    }
}
