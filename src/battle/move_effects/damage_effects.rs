// In: src/battle/move_effects/damage_effects.rs

// --- IMPORTS ---
use crate::battle::context::MoveResolutionContext;
use crate::battle::hooks::HookKind;
use crate::battle::state::ParticipantId;
use crate::battle::stats::{
    attack_stat_for, calculate_damage, defense_stat_for, scale_damage, type_effectiveness, DamageInputs, StageMode,
};
use crate::battle::task::BattleTask;
use crate::battle::world::{BattleWorld, QueueKind};
use schema::{MoveCategory, StatusCondition};

/// Effectiveness below this counts as "no effect".
const NO_EFFECT_THRESHOLD: f32 = 0.1;

// --- STANDALONE HELPER FUNCTIONS ---

fn effectiveness_against_target(world: &BattleWorld, ctx: &MoveResolutionContext) -> f32 {
    let Some(data) = ctx.move_data() else {
        return 1.0;
    };
    let types = world
        .species_of(ctx.target)
        .map(|species| species.types.as_slice())
        .unwrap_or(&[]);
    type_effectiveness(data.move_type, types)
}

fn queue_hp_change(world: &mut BattleWorld, target: ParticipantId, amount: u32) {
    world.enqueue(QueueKind::Move, BattleTask::animate_hp(target, -(amount as f32)));
}

fn reset_hit(ctx: &mut MoveResolutionContext) {
    ctx.hit = false;
    ctx.damage_buffer = 0;
}

/// Standard damage from the user to the target.
pub(crate) fn damage(world: &mut BattleWorld, ctx: &mut MoveResolutionContext) {
    reset_hit(ctx);
    let Some(data) = ctx.move_data.clone() else {
        tracing::warn!("damage requested outside a move");
        return;
    };
    let (Some(attack_stat), Some(defense_stat)) = (attack_stat_for(data.category), defense_stat_for(data.category))
    else {
        tracing::warn!(move_id = %data.id, "damage requested by a status move");
        return;
    };

    let effectiveness = effectiveness_against_target(world, ctx);
    if effectiveness < NO_EFFECT_THRESHOLD {
        let text = format!("It doesn't affect {}...", world.participant(ctx.target).name);
        world.show_text(text);
        return;
    }

    // Critical hits ignore the attacker's drops and the defender's boosts.
    let critical = ctx.critical;
    let (attack_mode, defense_mode) = if critical {
        (StageMode::IgnoreNegative, StageMode::IgnorePositive)
    } else {
        (StageMode::All, StageMode::All)
    };
    let attack = world.effective_stat(ctx.user, attack_stat, attack_mode);
    let defense = world.effective_stat(ctx.target, defense_stat, defense_mode);

    let user = world.participant(ctx.user);
    let stab = world
        .species_of(ctx.user)
        .is_some_and(|species| species.types.contains(&data.move_type));
    let burned_physical = user.status == StatusCondition::Burn && data.category == MoveCategory::Physical;
    let level = user.level;

    world.trigger_user_events(ctx, &HookKind::BeforeDamageInflict);

    let inputs = DamageInputs {
        level,
        power: data.power,
        attack: attack as u32,
        defense: defense as u32,
        critical,
        stab,
        effectiveness,
        burned_physical,
        targets: 1.0,
        weather: 1.0,
        others: 1.0,
    };
    let amount = scale_damage(calculate_damage(&inputs, world.rng.as_mut()), ctx.damage_multiplier);
    tracing::debug!(user = %ctx.user, target = %ctx.target, move_id = %data.id, amount, "damage");

    queue_hp_change(world, ctx.target, amount);
    ctx.hit = true;
    ctx.damage_buffer = amount;
    ctx.critical = false;
    ctx.damage_multiplier = 1.0;

    if critical {
        world.show_text("A critical hit!");
    }
    if effectiveness > 1.0 {
        world.show_text("It's super effective!");
    } else if effectiveness < 1.0 {
        world.show_text("It's not very effective...");
    }
}

/// Damage, then a fixed amount of recoil to the user if it connected.
pub(crate) fn damage_with_fixed_recoil(world: &mut BattleWorld, ctx: &mut MoveResolutionContext, lost_hp: u32) {
    damage(world, ctx);
    if ctx.hit {
        apply_recoil(world, ctx, lost_hp);
    }
}

/// Damage, then recoil of `rate` times the damage dealt (at least 1).
pub(crate) fn damage_with_recoil(world: &mut BattleWorld, ctx: &mut MoveResolutionContext, rate: f64) {
    damage(world, ctx);
    if ctx.hit {
        let recoil = ((ctx.damage_buffer as f64 * rate).floor() as u32).max(1);
        apply_recoil(world, ctx, recoil);
    }
}

fn apply_recoil(world: &mut BattleWorld, ctx: &MoveResolutionContext, amount: u32) {
    queue_hp_change(world, ctx.user, amount);
    let text = format!("{} is hit with recoil!", world.participant(ctx.user).name);
    world.show_text(text);
}

/// Removes exactly `amount` HP from the target.
///
/// Inside a move, a target immune to the move's type is unaffected. Outside
/// a move (status hooks) the damage always applies.
pub(crate) fn fixed_damage(world: &mut BattleWorld, ctx: &mut MoveResolutionContext, amount: u32) {
    reset_hit(ctx);
    if ctx.move_data.is_some() && effectiveness_against_target(world, ctx) < NO_EFFECT_THRESHOLD {
        let text = format!("It doesn't affect {}...", world.participant(ctx.target).name);
        world.show_text(text);
        return;
    }

    tracing::debug!(target = %ctx.target, amount, "fixed damage");
    queue_hp_change(world, ctx.target, amount);
    ctx.hit = true;
    ctx.damage_buffer = amount;
}
