// In: src/battle/move_effects/mod.rs

// --- 1. DECLARE HELPER MODULES ---
pub(crate) mod damage_effects;
pub(crate) mod stat_effects;
pub(crate) mod status_effects;

// --- 2. IMPORTS ---
use crate::battle::context::MoveResolutionContext;
use crate::battle::hooks::HookKind;
use crate::battle::world::BattleWorld;
use schema::MoveFunction;

use self::{damage_effects::*, stat_effects::*};

// --- 3. FUNCTION CODE DISPATCH ---

/// Applies the mechanical effect selected by the move's function code.
pub(crate) fn apply_move_function(world: &mut BattleWorld, ctx: &mut MoveResolutionContext) {
    let Some(function) = ctx.move_data().map(|data| data.function()) else {
        return;
    };

    match function {
        MoveFunction::Damage => damage(world, ctx),
        MoveFunction::LowerStat { stat, stages } => lower_stat(world, ctx.target, stat, stages),
        MoveFunction::RaiseStat { stat, stages } => raise_stat(world, ctx.target, stat, stages),
        MoveFunction::DamageWithRecoil { rate } => damage_with_recoil(world, ctx, rate),
        MoveFunction::FixedDamage { amount } => fixed_damage(world, ctx, amount),
        MoveFunction::TargetCurrentHp => {
            let amount = world.participant(ctx.target).current_hp().ceil() as u32;
            fixed_damage(world, ctx, amount);
        }
        MoveFunction::OnUseHook => world.trigger_user_events(ctx, &HookKind::OnUse),
        MoveFunction::Unknown { code, parameter } => {
            tracing::warn!(
                move_id = ctx.move_id().unwrap_or_default(),
                code,
                parameter,
                "unknown function code; move has no effect"
            );
        }
    }
}
