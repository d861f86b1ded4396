//! Shells: swappable PC chassis, and the staged mutations the workbench
//! session applies to them.

use std::collections::HashMap;

use crate::urn::{ItemUrn, SchemaUrn};
use crate::world::item::Inventory;
use crate::world::types::{AnatomySlot, CoreStats};

pub type ShellId = String;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shell {
    pub id: ShellId,
    pub name: String,
    pub stats: CoreStats,
    pub inventory: Inventory,
    pub equipment: HashMap<AnatomySlot, ItemUrn>,
}

impl Shell {
    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: CoreStats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            inventory: HashMap::new(),
            equipment: HashMap::new(),
        }
    }
}

/// Which of a shell's stat triple a `Stat` mutation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum StatField {
    Pow,
    Fin,
    Res,
}

impl StatField {
    pub fn get(&self, stats: &CoreStats) -> i64 {
        match self {
            Self::Pow => stats.pow,
            Self::Fin => stats.fin,
            Self::Res => stats.res,
        }
    }

    pub fn set(&self, stats: &mut CoreStats, value: i64) {
        match self {
            Self::Pow => stats.pow = value,
            Self::Fin => stats.fin = value,
            Self::Res => stats.res = value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatOp {
    Add,
    Subtract,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentOp {
    Mount,
    Unmount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryTransferOp {
    ToVault,
    FromVault,
}

/// A single staged shell mutation. Variants mirror spec §3's tagged union
/// exactly; the spec's two competing field spellings (`pendingChanges`
/// vs `pendingMutations`) are resolved in favor of `pendingMutations`
/// (see DESIGN.md).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShellMutation {
    Stat {
        stat: StatField,
        op: StatOp,
        amount: i64,
    },
    Component {
        op: ComponentOp,
        component_id: String,
        schema: SchemaUrn,
    },
    Inventory {
        op: InventoryTransferOp,
        item_id: ItemUrn,
        quantity: u32,
    },
    Metadata {
        new_name: String,
    },
}

/// Per-mutation currency cost, summed by the workbench session's cost
/// operation.
pub fn mutation_cost(mutation: &ShellMutation) -> i64 {
    match mutation {
        ShellMutation::Stat { amount, .. } => amount.abs() * 10,
        ShellMutation::Component { .. } => 250,
        ShellMutation::Inventory { quantity, .. } => *quantity as i64 * 5,
        ShellMutation::Metadata { .. } => 0,
    }
}

/// A structured comparison of a shell before and after its pending
/// mutations have been previewed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShellDiff {
    /// Per-stat "old -> new" tokens, keyed by stat name.
    pub stats: HashMap<String, String>,
    /// Per-performance-metric tokens (e.g. mass, mounted component count).
    pub metrics: HashMap<String, String>,
}

impl ShellDiff {
    pub fn compute(baseline: &Shell, preview: &Shell) -> Self {
        let mut stats = HashMap::new();
        for (name, field) in [
            ("pow", StatField::Pow),
            ("fin", StatField::Fin),
            ("res", StatField::Res),
        ] {
            let old = field.get(&baseline.stats);
            let new = field.get(&preview.stats);
            if old != new {
                stats.insert(name.to_string(), format!("{old} -> {new}"));
            }
        }

        let mut metrics = HashMap::new();
        let old_items = baseline.inventory.len();
        let new_items = preview.inventory.len();
        if old_items != new_items {
            metrics.insert(
                "inventory_count".to_string(),
                format!("{old_items} -> {new_items}"),
            );
        }
        let old_mounted = baseline.equipment.len();
        let new_mounted = preview.equipment.len();
        if old_mounted != new_mounted {
            metrics.insert(
                "mounted_components".to_string(),
                format!("{old_mounted} -> {new_mounted}"),
            );
        }

        Self { stats, metrics }
    }
}
