//! Small shared value types used across the entity model.

use std::collections::HashMap;

use crate::urn::ActorUrn;

/// Monotonic in-world timestamp. Injected by the transformer context's
/// `timestamp()` service, never read from the wall clock by a reducer.
pub type Tick = u64;

/// Compass-style exit direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
}

/// Visibility of a presence entry in a place's `entities` map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    VisibleToEveryone,
    VisibleToParty,
    Hidden,
}

/// A weak-reference-style descriptor: places hold this instead of a copy
/// of the actor. The canonical `Actor` lives only in `World::actors`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresenceEntry {
    pub visibility: Visibility,
}

/// Traditional six stats plus the setting's own POW/FIN/RES triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreStats {
    pub pow: i64,
    pub fin: i64,
    pub res: i64,
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
}

/// Bounded hit points with a cached max (modifiers may raise or lower it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub current: i64,
    pub max: i64,
}

impl HitPoints {
    pub fn new(max: i64) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Applies signed delta, clamped to `[0, max]`.
    pub fn apply_delta(&mut self, delta: i64) {
        self.current = (self.current + delta).clamp(0, self.max);
    }
}

/// Anatomy slot an equippable item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AnatomySlot {
    Head,
    Torso,
    Hands,
    Feet,
    MainHand,
    OffHand,
    Accessory,
}

/// Currency wallet, keyed by currency name (see `config::ALLOWED_CURRENCIES`
/// for the set `CREDIT` is allowed to mint into; wallets may hold other
/// currencies seeded by scenario content).
pub type Wallet = HashMap<String, i64>;

/// Skill ranks, keyed by skill id.
pub type Skills = HashMap<String, i64>;

/// Party/faction membership pointer.
pub type PartyRef = Option<crate::urn::GroupUrn>;

/// An actor's descriptor in a place's presence list.
pub type EntitiesPresent = HashMap<ActorUrn, PresenceEntry>;
