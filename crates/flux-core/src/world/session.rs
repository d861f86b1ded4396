//! Sessions: combat encounters and workbench staging, the two variants
//! the spec's tagged `Session` union carries.

use std::collections::{HashMap, VecDeque};

use crate::urn::{ActorUrn, SessionUrn};
use crate::world::shell::{Shell, ShellId, ShellMutation};
use crate::world::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStrategy {
    Combat,
    Workbench,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Running,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE")]
pub enum Team {
    Alpha,
    Bravo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub actor: ActorUrn,
    pub team: Team,
    pub action_points: i64,
    pub energy: i64,
    pub target: Option<ActorUrn>,
}

impl Combatant {
    pub fn new(actor: ActorUrn, team: Team) -> Self {
        Self {
            actor,
            team,
            action_points: 3,
            energy: 10,
            target: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSessionData {
    pub combatants: HashMap<ActorUrn, Combatant>,
    pub round: u32,
    pub turn: u32,
    pub initiative: VecDeque<ActorUrn>,
}

impl CombatSessionData {
    pub fn living_on_team(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .values()
            .filter(move |c| c.team == team)
    }

    pub fn team_has_living_member(&self, team: Team, is_alive: impl Fn(&ActorUrn) -> bool) -> bool {
        self.living_on_team(team).any(|c| is_alive(&c.actor))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbenchSessionData {
    pub actor_id: ActorUrn,
    pub current_shell_id: ShellId,
    pub pending_mutations: Vec<ShellMutation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionData {
    Combat(CombatSessionData),
    Workbench(WorkbenchSessionData),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub urn: SessionUrn,
    pub strategy: SessionStrategy,
    pub status: SessionStatus,
    pub data: SessionData,
    pub created_at: Tick,
}

impl Session {
    pub fn as_workbench(&self) -> Option<&WorkbenchSessionData> {
        match &self.data {
            SessionData::Workbench(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_workbench_mut(&mut self) -> Option<&mut WorkbenchSessionData> {
        match &mut self.data {
            SessionData::Workbench(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_combat(&self) -> Option<&CombatSessionData> {
        match &self.data {
            SessionData::Combat(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_combat_mut(&mut self) -> Option<&mut CombatSessionData> {
        match &mut self.data {
            SessionData::Combat(data) => Some(data),
            _ => None,
        }
    }
}

/// Applies `pending_mutations` to a clone of `base`, returning the
/// resulting preview without touching session or world state. Pure, as
/// required by the workbench preview operation (spec §4.5).
pub fn preview_shell(base: &Shell, pending_mutations: &[ShellMutation]) -> Shell {
    use crate::world::shell::{ComponentOp, InventoryTransferOp, StatOp};

    let mut preview = base.clone();
    for mutation in pending_mutations {
        match mutation {
            ShellMutation::Stat { stat, op, amount } => {
                let current = stat.get(&preview.stats);
                let next = match op {
                    StatOp::Add => current + amount,
                    StatOp::Subtract => current - amount,
                };
                stat.set(&mut preview.stats, next);
            }
            ShellMutation::Component {
                op,
                component_id,
                schema,
            } => match op {
                ComponentOp::Mount => {
                    if let Ok(slot) = component_id.parse() {
                        if let Ok(item) = schema.to_string().parse() {
                            preview.equipment.insert(slot, item);
                        }
                    }
                }
                ComponentOp::Unmount => {
                    if let Ok(slot) = component_id.parse() {
                        preview.equipment.remove(&slot);
                    }
                }
            },
            ShellMutation::Inventory {
                op,
                item_id,
                quantity,
            } => match op {
                InventoryTransferOp::FromVault => {
                    preview
                        .inventory
                        .entry(item_id.clone())
                        .or_insert_with(|| crate::world::item::InventorySlot {
                            item: item_id.clone(),
                            quantity: 0,
                            mass: 0,
                            last_update: 0,
                        })
                        .quantity += quantity;
                }
                InventoryTransferOp::ToVault => {
                    if let Some(slot) = preview.inventory.get_mut(item_id) {
                        slot.quantity = slot.quantity.saturating_sub(*quantity);
                        if slot.quantity == 0 {
                            preview.inventory.remove(item_id);
                        }
                    }
                }
            },
            ShellMutation::Metadata { new_name } => {
                preview.name = new_name.clone();
            }
        }
    }
    preview
}

/// Sums the currency cost of every pending mutation.
pub fn mutations_cost(pending_mutations: &[ShellMutation]) -> i64 {
    pending_mutations
        .iter()
        .map(crate::world::shell::mutation_cost)
        .sum()
}
