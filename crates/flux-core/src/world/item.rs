//! Items: world-owned, located in exactly one of an actor's inventory, a
//! place, or a container item (spec §3 mutual-exclusion invariant).

use std::collections::HashMap;

use crate::urn::{ActorUrn, ItemUrn, PlaceUrn, SchemaUrn};
use crate::world::types::Tick;

/// Where an item currently lives. Exactly one location is ever true for a
/// given item, enforced structurally by storing this alongside the item
/// rather than relying on two maps staying in sync.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemLocation {
    Actor(ActorUrn),
    Place(PlaceUrn),
    Container(ItemUrn),
}

/// Condition of an item (wear, durability); opaque beyond ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition(pub u8);

impl Condition {
    pub const PRISTINE: Condition = Condition(100);

    pub fn is_broken(&self) -> bool {
        self.0 == 0
    }
}

/// An item instance. `contents` is populated only for items whose schema
/// marks them as containers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub urn: ItemUrn,
    pub schema: SchemaUrn,
    pub condition: Condition,
    pub location: ItemLocation,
    pub contents: Option<HashMap<ItemUrn, Item>>,
}

impl Item {
    pub fn new(urn: ItemUrn, schema: SchemaUrn, location: ItemLocation) -> Self {
        Self {
            urn,
            schema,
            condition: Condition::PRISTINE,
            location,
            contents: None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.contents.is_some()
    }
}

/// An inventory slot: an item plus the bookkeeping an inventory mass
/// recomputation needs (spec §3: "may be stale with `ts`, but consumers
/// must refresh before acting on it").
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: ItemUrn,
    pub quantity: u32,
    pub mass: u64,
    pub last_update: Tick,
}

/// An actor's or shell's inventory: item urn to slot.
pub type Inventory = HashMap<ItemUrn, InventorySlot>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_flag_follows_contents_presence() {
        let urn: ItemUrn = "flux:item:crate-1".parse().unwrap();
        let schema: SchemaUrn = "flux:schema:wooden-crate".parse().unwrap();
        let place: PlaceUrn = "flux:place:town:square".parse().unwrap();
        let mut item = Item::new(urn, schema, ItemLocation::Place(place));
        assert!(!item.is_container());
        item.contents = Some(HashMap::new());
        assert!(item.is_container());
    }
}
