//! World events: the declared, externally-visible record of what a
//! reducer did. Every successful command run through a
//! [`crate::context::TransformerContext`] declares zero or more of these;
//! they are the only channel a shell or narrative layer observes.

use crate::ids::Id;
use crate::urn::{ActorUrn, GroupUrn, PlaceUrn, SessionUrn};
use crate::world::Tick;
use crate::command::CommandId;

/// Stable, wire-facing event identifiers (spec §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ActorDidMove,
    ActorDidMaterialize,
    ActorDidDematerialize,
    ActorDidLook,
    ActorDidListShells,
    ActorDidRenameShell,
    ActorDidInspectParty,
    ActorDidInviteToParty,
    ActorDidJoinParty,
    ActorDidLeaveParty,
    ActorDidReceiveCurrency,

    WorkbenchSessionDidStart,
    WorkbenchShellMutationStaged,
    WorkbenchSessionDidCommit,
    WorkbenchSessionDidAbandon,

    CombatantDidAttack,
    CombatantWasAttacked,
    CombatantDidDefend,
    CombatantDidAcquireTarget,
    CombatantDidDie,
    CombatSessionDidStart,
    CombatSessionDidEnd,
    CombatSessionStatusDidChange,
    CombatRoundDidStart,
    CombatRoundDidEnd,
    CombatTurnDidStart,
    CombatTurnDidEnd,

    ItemDidChangeLocation,
    PlaceWeatherDidChange,
    PlaceResourceDidChange,
}

/// A declared world event, always carrying the command trace that
/// produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldEvent {
    pub id: Id,
    pub event_type: EventType,
    pub actor: ActorUrn,
    pub location: PlaceUrn,
    pub trace: CommandId,
    pub ts: Tick,
    pub payload: EventPayload,
}

impl WorldEvent {
    pub fn new(
        id: Id,
        event_type: EventType,
        actor: ActorUrn,
        location: PlaceUrn,
        trace: CommandId,
        ts: Tick,
        payload: EventPayload,
    ) -> Self {
        Self {
            id,
            event_type,
            actor,
            location,
            trace,
            ts,
            payload,
        }
    }
}

/// Per-event-family payload. Kept as a single enum (rather than a
/// `Box<dyn Any>`) so downstream narrative lookups can match
/// exhaustively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventPayload {
    None,
    Move {
        from: PlaceUrn,
        to: PlaceUrn,
    },
    Presence {
        place: PlaceUrn,
    },
    ShellRenamed {
        shell_id: String,
        old_name: String,
        new_name: String,
    },
    Party {
        party: GroupUrn,
        subject: Option<ActorUrn>,
    },
    PartyInspected {
        party: GroupUrn,
        owner: Option<ActorUrn>,
        members: Vec<ActorUrn>,
        invitations: Option<Vec<ActorUrn>>,
    },
    Credited {
        currency: String,
        amount: i64,
    },
    Session {
        session: SessionUrn,
    },
    Attack {
        target: ActorUrn,
        roll: i64,
        damage: i64,
        hit: bool,
    },
    Died {
        killer: Option<ActorUrn>,
    },
    CombatStatus {
        session: SessionUrn,
        round: u32,
        turn: u32,
    },
    CombatEnded {
        session: SessionUrn,
        winning_team: crate::world::Team,
        final_round: u32,
        final_turn: u32,
    },
    Weather {
        place: PlaceUrn,
    },
    Resource {
        place: PlaceUrn,
        resource: String,
        delta: i64,
    },
}
