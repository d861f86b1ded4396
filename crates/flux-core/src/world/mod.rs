//! The world projection: the in-memory state every reducer mutates.
//!
//! `World` owns every entity by URN. Reducers receive `&mut World` for the
//! duration of one intent (see `flux_engine::registry::Dispatcher`) and
//! mutate it directly; there is no copy-on-write or event-sourced replay
//! inside this crate — the teacher's `GameState`/`EntityId` arena pattern,
//! generalized from a tile map to a multi-kind URN-keyed arena.

pub mod actor;
pub mod group;
pub mod item;
pub mod place;
pub mod schema;
pub mod session;
pub mod shell;
pub mod types;

use std::collections::HashMap;

pub use actor::{Actor, ActorKind};
pub use group::{Group, GroupKind};
pub use item::{Inventory, InventorySlot, Item, ItemLocation};
pub use place::{Exit, Place, Weather};
pub use schema::{Schema, SchemaRegistry};
pub use session::{
    preview_shell, mutations_cost, Combatant, CombatSessionData, Session, SessionData,
    SessionStatus, SessionStrategy, Team, WorkbenchSessionData,
};
pub use shell::{Shell, ShellId, ShellMutation};
pub use types::{AnatomySlot, CoreStats, Direction, EntitiesPresent, HitPoints, PresenceEntry, Tick, Visibility};

use crate::urn::{ActorUrn, GroupUrn, ItemUrn, PlaceUrn, SessionUrn};

/// The in-memory world projection.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub actors: HashMap<ActorUrn, Actor>,
    pub places: HashMap<PlaceUrn, Place>,
    pub items: HashMap<ItemUrn, Item>,
    pub groups: HashMap<GroupUrn, Group>,
    pub sessions: HashMap<SessionUrn, Session>,
    pub schemas: SchemaRegistry,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&self, urn: &ActorUrn) -> Option<&Actor> {
        self.actors.get(urn)
    }

    pub fn actor_mut(&mut self, urn: &ActorUrn) -> Option<&mut Actor> {
        self.actors.get_mut(urn)
    }

    pub fn insert_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.urn.clone(), actor);
    }

    pub fn place(&self, urn: &PlaceUrn) -> Option<&Place> {
        self.places.get(urn)
    }

    pub fn place_mut(&mut self, urn: &PlaceUrn) -> Option<&mut Place> {
        self.places.get_mut(urn)
    }

    pub fn insert_place(&mut self, place: Place) {
        self.places.insert(place.urn.clone(), place);
    }

    pub fn item(&self, urn: &ItemUrn) -> Option<&Item> {
        self.items.get(urn)
    }

    pub fn item_mut(&mut self, urn: &ItemUrn) -> Option<&mut Item> {
        self.items.get_mut(urn)
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.urn.clone(), item);
    }

    pub fn group(&self, urn: &GroupUrn) -> Option<&Group> {
        self.groups.get(urn)
    }

    pub fn group_mut(&mut self, urn: &GroupUrn) -> Option<&mut Group> {
        self.groups.get_mut(urn)
    }

    pub fn insert_group(&mut self, group: Group) {
        self.groups.insert(group.urn.clone(), group);
    }

    pub fn session(&self, urn: &SessionUrn) -> Option<&Session> {
        self.sessions.get(urn)
    }

    pub fn session_mut(&mut self, urn: &SessionUrn) -> Option<&mut Session> {
        self.sessions.get_mut(urn)
    }

    pub fn insert_session(&mut self, session: Session) {
        self.sessions.insert(session.urn.clone(), session);
    }

    /// Finds the pending workbench session (if any) already owned by
    /// `actor`, enforcing the "one pending workbench session per actor"
    /// invariant (spec §4.6).
    pub fn pending_workbench_session_for(&self, actor: &ActorUrn) -> Option<&Session> {
        let actor_state = self.actor(actor)?;
        actor_state
            .sessions
            .keys()
            .filter_map(|session_urn| self.session(session_urn))
            .find(|session| {
                session.strategy == SessionStrategy::Workbench
                    && session.status == SessionStatus::Pending
                    && session
                        .as_workbench()
                        .is_some_and(|data| &data.actor_id == actor)
            })
    }

    /// Finds an actor by case-insensitive name match, for resolving free
    /// text like `attack bob` into an `ActorUrn` (spec §6's textual
    /// surface; players don't type URNs).
    pub fn actor_by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.values().find(|actor| actor.name.eq_ignore_ascii_case(name))
    }

    /// Finds the party (if any) that has extended a pending invitation to
    /// `actor`, for resolving bare `party accept` / `party reject` text
    /// that names no party explicitly.
    pub fn pending_invitation_for(&self, actor: &ActorUrn) -> Option<&Group> {
        self.groups.values().find(|group| group.invitations.contains_key(actor))
    }

    /// Moves an actor's presence descriptor from `from` to `to`, setting
    /// `actor.location = to`. Callers are responsible for having already
    /// validated the exit exists; this only performs the mechanical move
    /// (spec §4.5 MOVE).
    pub fn relocate_actor(
        &mut self,
        actor_urn: &ActorUrn,
        from: &PlaceUrn,
        to: &PlaceUrn,
    ) -> Option<types::PresenceEntry> {
        let entry = self
            .places
            .get_mut(from)
            .and_then(|place| place.entities.remove(actor_urn));

        if let Some(entry) = entry {
            if let Some(place) = self.places.get_mut(to) {
                place.entities.insert(actor_urn.clone(), entry);
            }
        }

        if let Some(actor) = self.actors.get_mut(actor_urn) {
            actor.location = to.clone();
        }

        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn(s: &str) -> crate::urn::Urn {
        s.parse().unwrap()
    }

    #[test]
    fn relocate_actor_moves_presence_and_location() {
        let mut world = World::new();
        let square = urn("flux:place:town:square");
        let gate = urn("flux:place:town:gate");
        world.insert_place(Place::new(square.clone(), "Town Square"));
        world.insert_place(Place::new(gate.clone(), "Town Gate"));

        let alice = urn("flux:actor:alice");
        world.insert_actor(Actor::new_pc(alice.clone(), "Alice", square.clone(), 10));
        world
            .place_mut(&square)
            .unwrap()
            .entities
            .insert(alice.clone(), types::PresenceEntry {
                visibility: Visibility::VisibleToEveryone,
            });

        world.relocate_actor(&alice, &square, &gate);

        assert!(!world.place(&square).unwrap().entities.contains_key(&alice));
        assert!(world.place(&gate).unwrap().entities.contains_key(&alice));
        assert_eq!(world.actor(&alice).unwrap().location, gate);
    }
}
