//! Tuned constants shared by reducers, dice rolls, and session machinery.
//!
//! Loading scenario or world content from files is an external collaborator
//! (spec §1, "Configuration loading") and is out of scope for this crate;
//! this module only holds the numeric constants the reducers themselves
//! are defined in terms of.

/// Upper bound on any single shell stat after mutation.
pub const MAX_STAT: i64 = 999;

/// Skill-rank-to-accuracy-bonus multiplier used by weapon accuracy rolls.
pub const ATTACK_SKILL_MULTIPLIER: f64 = 0.8;

/// Upper bound on a single `CREDIT` grant, matching `Number.MAX_SAFE_INTEGER`
/// in the original distillation.
pub const MAX_SAFE_CREDIT: i64 = 9_007_199_254_740_991;

/// Currencies the `CREDIT` command is allowed to mint.
pub const ALLOWED_CURRENCIES: &[&str] = &["credits", "scrip", "tokens"];

/// Number of integration steps used by fixed-step numerical previews
/// (workbench mutation preview, energy-recovery curves referenced by
/// physics helpers external to this crate).
pub const PREVIEW_INTEGRATION_STEPS: u32 = 32;

/// Maximum depth of a reducer-combinator chain before it is considered a
/// configuration bug rather than legitimate composition.
pub const MAX_COMBINATOR_DEPTH: usize = 16;

/// Action-point costs of the per-combatant combat operators (spec §4.6).
pub const STRIKE_AP_COST: i64 = 1;
pub const CLEAVE_AP_COST: i64 = 2;
pub const ATTACK_AP_COST: i64 = 1;
pub const DEFEND_AP_COST: i64 = 1;
pub const ADVANCE_AP_COST: i64 = 1;
pub const RETREAT_AP_COST: i64 = 1;
pub const TARGET_AP_COST: i64 = 0;

/// Base weapon accuracy spec used when no equipped item overrides it.
pub const DEFAULT_WEAPON_DICE: &str = "1d8";
