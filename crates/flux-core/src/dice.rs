//! Dice rolling: the engine's sole source of gameplay randomness.
//!
//! Grounded in the teacher's `RngOracle`/`compute_seed` determinism
//! philosophy (env/rng.rs): randomness never comes from a bare `rand`
//! call at the use site, it comes through an injected source so replay
//! and tests can pin the sequence.

use rand::Rng;

/// Injectable randomness source for dice rolls and other gameplay
/// nondeterminism. Implementations backed by a seeded PRNG make the
/// whole pipeline replayable (spec §5).
pub trait RandomSource {
    /// Inclusive range `[low, high]`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Production randomness source backed by `rand_pcg`, seeded externally.
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("malformed dice spec: {0}")]
    MalformedSpec(String),
}

impl crate::error::EngineError for DiceError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "INVALID_ARGUMENT"
    }
}

/// `sum` is the grand total (dice plus bonus); `bonus` is broken out
/// separately so callers can show the flat modifier on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceRoll {
    pub values: Vec<u32>,
    pub sum: i64,
    pub bonus: i64,
}

impl DiceRoll {
    pub fn total(&self) -> i64 {
        self.sum
    }
}

/// Parses and rolls a dice spec of the form `NdM` or `NdM+B`
/// (`count` dice of `sides` sides, plus a flat bonus), per spec §4.7. A
/// present-but-zero bonus (`NdM+0`) is rejected: the bonus suffix must
/// be absent entirely rather than written out as zero.
pub fn roll_dice(spec: &str, rng: &mut dyn RandomSource) -> Result<DiceRoll, DiceError> {
    let spec = spec.trim();
    let (dice_part, bonus_part) = match spec.split_once('+') {
        Some((d, b)) => (d, Some(b)),
        None => (spec, None),
    };

    let (count_str, sides_str) = dice_part
        .split_once('d')
        .ok_or_else(|| DiceError::MalformedSpec(spec.to_string()))?;

    let count: u32 = count_str
        .parse()
        .map_err(|_| DiceError::MalformedSpec(spec.to_string()))?;
    let sides: u32 = sides_str
        .parse()
        .map_err(|_| DiceError::MalformedSpec(spec.to_string()))?;

    if count == 0 || sides == 0 {
        return Err(DiceError::MalformedSpec(spec.to_string()));
    }

    let bonus: i64 = match bonus_part {
        Some(b) => {
            let bonus: i64 = b
                .parse()
                .map_err(|_| DiceError::MalformedSpec(spec.to_string()))?;
            if bonus == 0 {
                return Err(DiceError::MalformedSpec(spec.to_string()));
            }
            bonus
        }
        None => 0,
    };

    let values: Vec<u32> = (0..count).map(|_| rng.roll_die(sides)).collect();
    let dice_total: i64 = values.iter().map(|&v| i64::from(v)).sum();

    Ok(DiceRoll { values, sum: dice_total + bonus, bonus })
}

/// A named, timestamped modifier applied to an attack roll (buffs,
/// stances, terrain). Modifiers are summed into the final result
/// alongside the natural roll and skill-derived bonus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollModifier {
    pub name: String,
    pub value: i64,
    pub applied_at: crate::world::Tick,
}

/// Resolves a weapon accuracy roll: natural dice plus a skill-derived
/// bonus (`effective_skill_rank * ATTACK_SKILL_MULTIPLIER`, truncated)
/// plus the sum of any active modifiers.
pub fn roll_attack(
    base_spec: &str,
    effective_skill_rank: i64,
    modifiers: &[RollModifier],
    rng: &mut dyn RandomSource,
) -> Result<i64, DiceError> {
    let natural = roll_dice(base_spec, rng)?;
    let skill_bonus = (effective_skill_rank as f64 * crate::config::ATTACK_SKILL_MULTIPLIER) as i64;
    let modifier_total: i64 = modifiers.iter().map(|m| m.value).sum();
    Ok(natural.sum + skill_bonus + modifier_total)
}

/// Deterministic source for tests: always returns the midpoint of the die.
pub struct FixedSource(pub u32);

impl RandomSource for FixedSource {
    fn roll_die(&mut self, _sides: u32) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_spec() {
        let mut rng = FixedSource(4);
        let roll = roll_dice("2d6", &mut rng).unwrap();
        assert_eq!(roll.values, vec![4, 4]);
        assert_eq!(roll.sum, 8);
        assert_eq!(roll.bonus, 0);
    }

    #[test]
    fn parses_spec_with_bonus() {
        let mut rng = FixedSource(3);
        let roll = roll_dice("1d20+5", &mut rng).unwrap();
        assert_eq!(roll.sum, 3 + 5);
        assert_eq!(roll.bonus, 5);
        assert_eq!(roll.total(), 3 + 5);
    }

    #[test]
    fn rejects_malformed_spec() {
        let mut rng = FixedSource(1);
        assert!(roll_dice("not-a-spec", &mut rng).is_err());
        assert!(roll_dice("0d6", &mut rng).is_err());
    }

    #[test]
    fn rejects_present_but_zero_bonus() {
        let mut rng = FixedSource(1);
        assert!(roll_dice("2d6+0", &mut rng).is_err());
    }

    #[test]
    fn attack_roll_is_deterministic_given_fixed_source() {
        let mut rng = FixedSource(10);
        let result = roll_attack("1d20", 10, &[], &mut rng).unwrap();
        assert_eq!(result, 10 + (10.0 * crate::config::ATTACK_SKILL_MULTIPLIER) as i64);
    }
}
