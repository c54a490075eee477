// In: src/battle/move_effects/stat_effects.rs

// --- IMPORTS ---
use crate::battle::state::{ParticipantId, MAX_STAGE};
use crate::battle::world::BattleWorld;
use schema::Stat;

// --- STANDALONE HELPER FUNCTIONS ---

fn drop_wording(levels: i32) -> &'static str {
    match levels {
        i32::MIN..=1 => "fell!",
        2 => "harshly fell!",
        _ => "severely fell!",
    }
}

fn rise_wording(levels: i32) -> &'static str {
    match levels {
        i32::MIN..=1 => "rose!",
        2 => "rose sharply!",
        _ => "rose drastically!",
    }
}

/// Lowers `stat` of `target` by `levels` stages. The stage changes at once;
/// only the message is queued.
pub(crate) fn lower_stat(world: &mut BattleWorld, target: ParticipantId, stat: Stat, levels: i32) {
    let name = world.participant(target).name.clone();
    let volatile = world.volatile_mut(target);

    let wording = if volatile.stage(stat) <= -MAX_STAGE {
        "won't go any lower!"
    } else {
        volatile.change_stage(stat, -levels);
        drop_wording(levels)
    };
    tracing::debug!(%target, ?stat, stage = volatile.stage(stat), "stat lowered");
    world.show_text(format!("{}'s {} {}", name, stat.display_name(), wording));
}

/// Raises `stat` of `target` by `levels` stages.
pub(crate) fn raise_stat(world: &mut BattleWorld, target: ParticipantId, stat: Stat, levels: i32) {
    let name = world.participant(target).name.clone();
    let volatile = world.volatile_mut(target);

    let wording = if volatile.stage(stat) >= MAX_STAGE {
        "won't go any higher!"
    } else {
        volatile.change_stage(stat, levels);
        rise_wording(levels)
    };
    tracing::debug!(%target, ?stat, stage = volatile.stage(stat), "stat raised");
    world.show_text(format!("{}'s {} {}", name, stat.display_name(), wording));
}
