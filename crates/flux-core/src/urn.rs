//! Opaque typed identifiers of the form `flux:<kind>:<tail>`.
//!
//! URNs are the only way entities reference each other across the world
//! projection. They are deliberately opaque strings rather than newtype
//! wrappers over `u64` indices: the tail is meaningful to content authors
//! (`flux:place:town:square`) and the kind tag lets a reducer reject a
//! URN of the wrong shape before ever touching the world.

use std::fmt;
use std::str::FromStr;

/// The entity-table tag carried by every URN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum UrnKind {
    Actor,
    Place,
    Item,
    Group,
    Session,
    Schema,
    Effect,
    Skill,
    Eco,
    Modifier,
}

/// Errors produced while parsing a URN from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrnError {
    #[error("urn must have the form flux:<kind>:<tail>, got {0:?}")]
    MalformedShape(String),
    #[error("unknown urn kind {0:?}")]
    UnknownKind(String),
    #[error("urn tail must be one or more segments of [a-z0-9_-]+, got {0:?}")]
    InvalidTail(String),
}

/// An opaque typed identifier: `flux:<kind>:<tail>`.
///
/// Equality and hashing are by the full lexical form, so two URNs of the
/// same kind and tail are always the same entity reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Urn {
    kind: UrnKind,
    tail: String,
}

impl Urn {
    /// The reserved SYSTEM authoring actor.
    pub const SYSTEM_ACTOR_TAIL: &'static str = "system";
    /// The reserved null destination place.
    pub const NOWHERE_PLACE_TAIL: &'static str = "nowhere";

    /// Constructs a URN from an already-validated kind and tail.
    ///
    /// # Errors
    /// Returns [`UrnError::InvalidTail`] if `tail` is not one or more
    /// `:`-delimited lowercase `[a-z0-9_-]+` segments.
    pub fn new(kind: UrnKind, tail: impl Into<String>) -> Result<Self, UrnError> {
        let tail = tail.into();
        if !is_valid_tail(&tail) {
            return Err(UrnError::InvalidTail(tail));
        }
        Ok(Self { kind, tail })
    }

    pub fn kind(&self) -> UrnKind {
        self.kind
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn system_actor() -> Self {
        Self {
            kind: UrnKind::Actor,
            tail: Self::SYSTEM_ACTOR_TAIL.to_string(),
        }
    }

    pub fn is_system_actor(&self) -> bool {
        self.kind == UrnKind::Actor && self.tail == Self::SYSTEM_ACTOR_TAIL
    }

    pub fn nowhere_place() -> Self {
        Self {
            kind: UrnKind::Place,
            tail: Self::NOWHERE_PLACE_TAIL.to_string(),
        }
    }

    pub fn is_nowhere(&self) -> bool {
        self.kind == UrnKind::Place && self.tail == Self::NOWHERE_PLACE_TAIL
    }
}

fn is_valid_tail(tail: &str) -> bool {
    if tail.is_empty() {
        return false;
    }
    tail.split(':').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    })
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flux:{}:{}", self.kind, self.tail)
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let scheme = parts.next().unwrap_or_default();
        let kind_str = parts.next();
        let tail = parts.next();

        let (kind_str, tail) = match (scheme, kind_str, tail) {
            ("flux", Some(kind_str), Some(tail)) => (kind_str, tail),
            _ => return Err(UrnError::MalformedShape(s.to_string())),
        };

        let kind = UrnKind::from_str(kind_str)
            .map_err(|_| UrnError::UnknownKind(kind_str.to_string()))?;

        Urn::new(kind, tail)
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}

/// Typed alias used at call sites that only ever hold an actor URN.
/// The representation is the same [`Urn`]; readers rely on the kind tag
/// having been checked at construction (see [`Urn::new`] and the
/// `expect_kind` helpers on [`crate::world`] accessors).
pub type ActorUrn = Urn;
pub type PlaceUrn = Urn;
pub type ItemUrn = Urn;
pub type GroupUrn = Urn;
pub type SessionUrn = Urn;
pub type SchemaUrn = Urn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_urn() {
        let urn: Urn = "flux:actor:alice".parse().unwrap();
        assert_eq!(urn.kind(), UrnKind::Actor);
        assert_eq!(urn.tail(), "alice");
        assert_eq!(urn.to_string(), "flux:actor:alice");
    }

    #[test]
    fn parses_multi_segment_tail() {
        let urn: Urn = "flux:place:town:square".parse().unwrap();
        assert_eq!(urn.tail(), "town:square");
    }

    #[test]
    fn rejects_malformed_shape() {
        assert!("actor:alice".parse::<Urn>().is_err());
        assert!("flux:actor".parse::<Urn>().is_err());
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("flux:widget:alice".parse::<Urn>().is_err());
    }

    #[test]
    fn rejects_invalid_tail_characters() {
        assert!("flux:actor:Alice".parse::<Urn>().is_err());
        assert!("flux:actor:alice!".parse::<Urn>().is_err());
    }

    #[test]
    fn system_and_nowhere_reserved_values() {
        assert!(Urn::system_actor().is_system_actor());
        assert!(Urn::nowhere_place().is_nowhere());
        assert_eq!(Urn::system_actor().to_string(), "flux:actor:system");
        assert_eq!(Urn::nowhere_place().to_string(), "flux:place:nowhere");
    }
}
