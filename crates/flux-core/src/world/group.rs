//! Groups: parties and factions.

use std::collections::HashMap;

use crate::urn::{ActorUrn, GroupUrn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GroupKind {
    Party,
    Faction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub urn: GroupUrn,
    pub kind: GroupKind,
    pub owner: Option<ActorUrn>,
    pub members: HashMap<ActorUrn, ()>,
    pub invitations: HashMap<ActorUrn, ()>,
}

impl Group {
    pub fn new_party(urn: GroupUrn, owner: ActorUrn) -> Self {
        let mut members = HashMap::new();
        members.insert(owner.clone(), ());
        Self {
            urn,
            kind: GroupKind::Party,
            owner: Some(owner),
            members,
            invitations: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_owner(&self, actor: &ActorUrn) -> bool {
        self.owner.as_ref() == Some(actor)
    }

    pub fn is_member(&self, actor: &ActorUrn) -> bool {
        self.members.contains_key(actor)
    }
}
