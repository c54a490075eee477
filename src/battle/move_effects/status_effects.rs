// In: src/battle/move_effects/status_effects.rs

// --- IMPORTS ---
use crate::battle::state::{Flag, FlagBearer, ParticipantId};
use crate::battle::world::BattleWorld;
use schema::StatusCondition;

// --- STANDALONE HELPER FUNCTIONS ---

fn inflicted_text(condition: StatusCondition, name: &str) -> String {
    match condition {
        StatusCondition::Normal => format!("{} is healthy.", name),
        StatusCondition::Burn => format!("{} was burned!", name),
        StatusCondition::Freeze => format!("{} was frozen solid!", name),
        StatusCondition::Paralysis => format!("{} is paralyzed! It may be unable to move!", name),
        StatusCondition::Poison => format!("{} was poisoned!", name),
        StatusCondition::Toxic => format!("{} was badly poisoned!", name),
        StatusCondition::Sleep => format!("{} fell asleep!", name),
    }
}

/// Inflicts a major status condition on `target` and attaches its flag.
///
/// Fails with "But it failed!" when the target already has one.
pub(crate) fn add_status_condition(world: &mut BattleWorld, target: ParticipantId, condition: StatusCondition) -> bool {
    let Some(flag_id) = condition.flag_id() else {
        remove_status_condition(world, target);
        return true;
    };
    if world.participant(target).status != StatusCondition::Normal {
        world.show_text("But it failed!");
        return false;
    }

    let pokemon = world.participant_mut(target);
    pokemon.status = condition;
    pokemon.asleep_rounds = 0;
    let text = inflicted_text(condition, &pokemon.name);
    add_flag(world, FlagBearer::Participant(target), flag_id, -1);
    tracing::debug!(%target, ?condition, "status inflicted");
    world.show_text(text);
    true
}

/// Clears the major status condition and its flag.
pub(crate) fn remove_status_condition(world: &mut BattleWorld, target: ParticipantId) {
    let previous = world.participant(target).status;
    if let Some(flag_id) = previous.flag_id() {
        remove_flag(world, FlagBearer::Participant(target), flag_id);
    }
    let pokemon = world.participant_mut(target);
    pokemon.status = StatusCondition::Normal;
    pokemon.asleep_rounds = 0;
}

/// Swaps the target's condition for `condition` without narration, moving
/// the flag along with it.
pub(crate) fn replace_status_condition(world: &mut BattleWorld, target: ParticipantId, condition: StatusCondition) {
    remove_status_condition(world, target);
    world.participant_mut(target).status = condition;
    if let Some(flag_id) = condition.flag_id() {
        add_flag(world, FlagBearer::Participant(target), flag_id, -1);
    }
    tracing::debug!(%target, ?condition, "status replaced");
}

pub(crate) fn sleep(world: &mut BattleWorld, target: ParticipantId, turns: u32) {
    world.participant_mut(target).asleep_rounds = turns;
}

pub(crate) fn reduce_sleep_counter(world: &mut BattleWorld, target: ParticipantId) {
    let pokemon = world.participant_mut(target);
    pokemon.asleep_rounds = pokemon.asleep_rounds.saturating_sub(1);
}

/// Attaches a flag. Re-adding a flag the bearer already has resets its
/// duration and keeps its payload.
pub(crate) fn add_flag(world: &mut BattleWorld, bearer: FlagBearer, id: &str, duration: i32) {
    let flag = Flag::new(id, bearer, duration);
    let flags = match bearer {
        FlagBearer::Participant(participant) => &mut world.volatile_mut(participant).flags,
        FlagBearer::Position(_) => match world.battle.as_mut() {
            Some(battle) => &mut battle.position_flags,
            None => {
                tracing::warn!(id, "position flag added outside a battle");
                return;
            }
        },
    };

    match flags.iter_mut().find(|existing| existing.id == id && existing.bearer == bearer) {
        Some(existing) => existing.remaining = flag.remaining,
        None => flags.push(flag),
    }
}

/// Detaches a flag; returns whether it was attached.
pub(crate) fn remove_flag(world: &mut BattleWorld, bearer: FlagBearer, id: &str) -> bool {
    let flags = match bearer {
        FlagBearer::Participant(participant) => &mut world.volatile_mut(participant).flags,
        FlagBearer::Position(_) => match world.battle.as_mut() {
            Some(battle) => &mut battle.position_flags,
            None => return false,
        },
    };
    let before = flags.len();
    flags.retain(|flag| !(flag.id == id && flag.bearer == bearer));
    flags.len() != before
}

pub(crate) fn has_flag(world: &BattleWorld, bearer: FlagBearer, id: &str) -> bool {
    match bearer {
        FlagBearer::Participant(participant) => world
            .volatile(participant)
            .is_some_and(|volatile| volatile.has_flag(id)),
        FlagBearer::Position(_) => world.battle.as_ref().is_some_and(|battle| {
            battle
                .position_flags
                .iter()
                .any(|flag| flag.id == id && flag.bearer == bearer)
        }),
    }
}
