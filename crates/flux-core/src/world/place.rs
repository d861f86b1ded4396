//! Places: locations with exits and a presence list of entities.

use std::collections::HashMap;

use crate::urn::PlaceUrn;
use crate::world::types::{Direction, EntitiesPresent};

/// A single exit from a place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exit {
    pub direction: Direction,
    pub label: String,
    pub to: PlaceUrn,
}

/// Resource yields available at a place (foraging, mining, etc.), opaque
/// beyond a name-to-quantity mapping; scenario content defines the names.
pub type Resources = HashMap<String, i64>;

/// Current weather at a place.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weather {
    #[default]
    Clear,
    Overcast,
    Rain,
    Storm,
    Snow,
    Fog,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    pub urn: PlaceUrn,
    pub name: String,
    pub description: String,
    pub ecosystem: String,
    pub coordinates: (i64, i64),
    pub entities: EntitiesPresent,
    pub exits: HashMap<Direction, Exit>,
    pub resources: Resources,
    pub weather: Weather,
}

impl Place {
    pub fn new(urn: PlaceUrn, name: impl Into<String>) -> Self {
        Self {
            urn,
            name: name.into(),
            description: String::new(),
            ecosystem: String::new(),
            coordinates: (0, 0),
            entities: HashMap::new(),
            exits: HashMap::new(),
            resources: HashMap::new(),
            weather: Weather::default(),
        }
    }

    /// Finds the exit (if any) leading to `dest`.
    pub fn exit_to(&self, dest: &PlaceUrn) -> Option<&Exit> {
        self.exits.values().find(|exit| &exit.to == dest)
    }
}
