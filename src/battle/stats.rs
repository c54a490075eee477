//! Stat-stage multipliers and the battle formulas built on them.

use crate::battle::rng::BattleRng;
use crate::battle::state::{VolatileData, MAX_STAGE};
use crate::pokemon::PokemonInst;
use schema::{MoveCategory, MoveData, PokemonType, Stat, StatusCondition};

/// Which stages a stat read should honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageMode {
    #[default]
    All,
    /// Positive stages count as zero (a critical hit ignoring the defender's boosts).
    IgnorePositive,
    /// Negative stages count as zero (a critical hit ignoring the attacker's drops).
    IgnoreNegative,
}

/// Multiplier for a battle stat at `stage`: (2+s)/2 upward, 2/(2+|s|) downward.
pub fn stat_stage_multiplier(stage: i32) -> f64 {
    let stage = stage.clamp(-MAX_STAGE, MAX_STAGE);
    if stage >= 0 {
        (2 + stage) as f64 / 2.0
    } else {
        2.0 / (2 + stage.abs()) as f64
    }
}

/// Accuracy/evasion multiplier, same shape with 3 in place of 2.
pub fn accuracy_stage_multiplier(stage: i32) -> f64 {
    let stage = stage.clamp(-MAX_STAGE, MAX_STAGE);
    if stage >= 0 {
        (3 + stage) as f64 / 3.0
    } else {
        3.0 / (3 + stage.abs()) as f64
    }
}

pub fn modified_stage(stage: i32, mode: StageMode) -> i32 {
    match mode {
        StageMode::All => stage,
        StageMode::IgnorePositive => stage.min(0),
        StageMode::IgnoreNegative => stage.max(0),
    }
}

/// Stage-adjusted stat, including status effects on the stat itself
/// (paralysis halves Speed).
pub fn effective_stat(
    pokemon: &PokemonInst,
    volatile: &VolatileData,
    stat: Stat,
    mode: StageMode,
) -> f64 {
    let standard = pokemon.stat(stat) as f64;
    let stage = modified_stage(volatile.stage(stat), mode);
    let mut value = standard * stat_stage_multiplier(stage);

    if stat == Stat::Speed && pokemon.status == StatusCondition::Paralysis {
        value /= 2.0;
    }

    value
}

/// Offensive stat a move category reads, `None` for status moves.
pub fn attack_stat_for(category: MoveCategory) -> Option<Stat> {
    match category {
        MoveCategory::Physical => Some(Stat::Attack),
        MoveCategory::Special => Some(Stat::SpecialAttack),
        MoveCategory::Status => None,
    }
}

pub fn defense_stat_for(category: MoveCategory) -> Option<Stat> {
    match category {
        MoveCategory::Physical => Some(Stat::Defense),
        MoveCategory::Special => Some(Stat::SpecialDefense),
        MoveCategory::Status => None,
    }
}

/// Hit check. Returns `true` when the move misses.
///
/// Moves with accuracy 0 never miss and draw no random number.
pub fn move_misses(
    move_data: &MoveData,
    attacker: &VolatileData,
    defender: &VolatileData,
    rng: &mut dyn BattleRng,
) -> bool {
    if move_data.accuracy == 0 {
        return false;
    }

    let accuracy_stage = (attacker.stage(Stat::Accuracy) - defender.stage(Stat::Evasion))
        .clamp(-MAX_STAGE, MAX_STAGE);
    let hit_rate = move_data.accuracy as f64 * accuracy_stage_multiplier(accuracy_stage);

    let roll = rng.range(1, 100, "accuracy check");
    tracing::debug!(hit_rate, roll, "hit check");
    roll as f64 > hit_rate
}

/// Chances in 24 of a critical hit at each critical-hit stage.
pub fn critical_hit_chance(stage: u32) -> i32 {
    match stage {
        0 => 1,
        1 => 3,
        2 => 12,
        _ => 24,
    }
}

pub fn is_critical_hit(critical_hit_stage: u32, rng: &mut dyn BattleRng) -> bool {
    rng.range(1, 24, "critical hit") <= critical_hit_chance(critical_hit_stage)
}

/// Type effectiveness of a move against a defender's types.
pub fn type_effectiveness(move_type: PokemonType, defender_types: &[PokemonType]) -> f32 {
    PokemonType::effectiveness_against(move_type, defender_types)
}

/// Everything the damage formula reads, gathered by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageInputs {
    pub level: u32,
    pub power: u32,
    pub attack: u32,
    pub defense: u32,
    pub critical: bool,
    pub stab: bool,
    pub effectiveness: f32,
    pub burned_physical: bool,
    pub targets: f64,
    pub weather: f64,
    /// Catch-all modifier; hook scaling is applied to the floored result
    /// instead, see [`scale_damage`].
    pub others: f64,
}

impl DamageInputs {
    /// The attack/defense ratio is an integer quotient taken before the
    /// power multiplication, so a weaker attacker falls to the base of 2.
    pub fn base_damage(&self) -> u32 {
        let ratio = self.attack / self.defense.max(1);
        ((2 * self.level) / 5 + 2) * self.power * ratio / 50 + 2
    }
}

/// Damage formula with the random factor drawn from `rng`.
///
/// Never returns less than 1; callers handle the "no effect" case before
/// calling it.
pub fn calculate_damage(inputs: &DamageInputs, rng: &mut dyn BattleRng) -> u32 {
    let base = inputs.base_damage();
    let critical = if inputs.critical { 1.5 } else { 1.0 };
    let random = rng.range(217, 255, "damage roll") as f64 / 255.0;
    let stab = if inputs.stab { 1.5 } else { 1.0 };
    let burn = if inputs.burned_physical { 0.5 } else { 1.0 };

    let modifier = inputs.targets
        * inputs.weather
        * critical
        * random
        * stab
        * inputs.effectiveness as f64
        * burn
        * inputs.others;
    let damage = (base as f64 * modifier).floor() as u32;

    tracing::debug!(base, modifier, damage, "damage calculated");
    damage.max(1)
}

/// Applies a `beforeDamageInflict` multiplier to already floored damage.
pub fn scale_damage(damage: u32, multiplier: f64) -> u32 {
    ((damage as f64 * multiplier).floor() as u32).max(1)
}

/// Experience awarded to a winner of `winner_level` for defeating a
/// participant of `fainted_level` and species `base_exp`.
pub fn calculate_exp_gain(
    winner_level: u32,
    fainted_level: u32,
    base_exp: u32,
    share_factor: u32,
    item_multiplier: f64,
) -> f64 {
    let winner_level = winner_level as f64;
    let fainted_level = fainted_level as f64;
    let share_factor = share_factor.max(1) as f64;

    let factor1 = base_exp as f64 * fainted_level / (5.0 * share_factor);
    let factor2 = (2.0 * fainted_level + 10.0).powf(2.5);
    let factor3 = (fainted_level + winner_level + 10.0).powf(2.5);
    (factor1 * (factor2 / factor3) + 1.0) * item_multiplier
}
