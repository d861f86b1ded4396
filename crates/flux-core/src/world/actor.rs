//! Actors: the autonomous entities that issue intents.

use std::collections::HashMap;

use crate::urn::{ActorUrn, ItemUrn, PlaceUrn};
use crate::world::item::Inventory;
use crate::world::shell::{Shell, ShellId};
use crate::world::types::{AnatomySlot, CoreStats, HitPoints, PartyRef, Skills, Tick, Wallet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    Pc,
    Npc,
    Monster,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub urn: ActorUrn,
    pub name: String,
    pub kind: ActorKind,
    pub location: PlaceUrn,
    pub stats: CoreStats,
    pub hp: HitPoints,
    pub inventory: Inventory,
    pub equipment: HashMap<AnatomySlot, ItemUrn>,
    /// PC-only: the chassis a character can switch between via the
    /// workbench. Empty for NPCs and monsters.
    pub shells: HashMap<ShellId, Shell>,
    /// PC-only: which entry of `shells` is currently equipped.
    pub current_shell: Option<ShellId>,
    pub party: PartyRef,
    /// Sessions this actor actively participates in, each timestamped
    /// with the tick it joined.
    pub sessions: HashMap<crate::urn::SessionUrn, Tick>,
    pub wallet: Wallet,
    pub skills: Skills,
}

impl Actor {
    pub fn new_npc(urn: ActorUrn, name: impl Into<String>, location: PlaceUrn, hp: i64) -> Self {
        Self {
            urn,
            name: name.into(),
            kind: ActorKind::Npc,
            location,
            stats: CoreStats::default(),
            hp: HitPoints::new(hp),
            inventory: HashMap::new(),
            equipment: HashMap::new(),
            shells: HashMap::new(),
            current_shell: None,
            party: None,
            sessions: HashMap::new(),
            wallet: HashMap::new(),
            skills: HashMap::new(),
        }
    }

    pub fn new_pc(urn: ActorUrn, name: impl Into<String>, location: PlaceUrn, hp: i64) -> Self {
        Self {
            kind: ActorKind::Pc,
            ..Self::new_npc(urn, name, location, hp)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp.is_alive()
    }

    pub fn current_shell(&self) -> Option<&Shell> {
        self.current_shell.as_ref().and_then(|id| self.shells.get(id))
    }

    pub fn is_party_owner_of(&self, party: &crate::urn::GroupUrn) -> bool {
        self.party.as_ref() == Some(party)
    }

    pub fn effective_skill_rank(&self, skill_id: &str) -> i64 {
        self.skills.get(skill_id).copied().unwrap_or(0)
    }
}
