//! Hooks shipped with the engine: major status conditions and the moves
//! whose whole effect is an `onUse` hook.

use crate::battle::hooks::{HookKind, HookRegistry};
use crate::battle::native::NativeApi;
use schema::{Stat, StatusCondition};

const FREEZE_THAW_PERCENT: i32 = 20;
const FULL_PARALYSIS_PERCENT: i32 = 25;

impl HookRegistry {
    /// A registry holding every built-in hook.
    pub fn with_builtin_hooks() -> Self {
        let mut registry = Self::new();
        register_builtin_hooks(&mut registry);
        registry
    }
}

pub fn register_builtin_hooks(registry: &mut HookRegistry) {
    register_status_hooks(registry);
    register_move_hooks(registry);
}

fn target_name(api: &NativeApi<'_>) -> String {
    api.participant(api.target()).name.clone()
}

fn max_hp_fraction(api: &NativeApi<'_>, numerator: u32, denominator: u32) -> u32 {
    let max_hp = api.participant(api.target()).max_hp();
    (max_hp * numerator).div_ceil(denominator).max(1)
}

// --- STATUS CONDITIONS ---

fn register_status_hooks(registry: &mut HookRegistry) {
    registry.register_flag_hook("Burn", HookKind::OnTurnEnd, |api| {
        let name = target_name(api);
        api.show_text(format!("{} is hurt by its burn!", name));
        let amount = max_hp_fraction(api, 1, 16);
        api.fixed_damage(amount);
    });

    registry.register_flag_hook("Freeze", HookKind::BeforeMove, |api| {
        let name = target_name(api);
        api.show_text(format!("{} is frozen solid!", name));
        if api.random(1, 100) <= FREEZE_THAW_PERCENT {
            api.show_text(format!("{} thawed out!", name));
            api.remove_status_condition();
        } else {
            api.negate_move();
        }
    });

    registry.register_flag_hook("Paralysis", HookKind::BeforeMove, |api| {
        if api.random(1, 100) <= FULL_PARALYSIS_PERCENT {
            let name = target_name(api);
            api.show_text(format!("{} is paralyzed! It can't move!", name));
            api.negate_move();
        }
    });

    registry.register_flag_hook("Poison", HookKind::OnTurnEnd, |api| {
        let name = target_name(api);
        api.show_text(format!("{} is hurt by poison!", name));
        let amount = max_hp_fraction(api, 1, 8);
        api.fixed_damage(amount);
    });

    // The payload counts the turns spent badly poisoned.
    registry.register_flag_hook("Toxic", HookKind::OnTurnEnd, |api| {
        let counter = api.flag_data() + 1;
        api.set_flag_data(counter);
        let name = target_name(api);
        api.show_text(format!("{} is hurt by poison!", name));
        let amount = max_hp_fraction(api, counter.max(1) as u32, 8);
        api.fixed_damage(amount);
    });

    registry.register_flag_hook("Toxic", HookKind::OnSwitchIn, |api| {
        api.set_flag_data(0);
    });

    // Bad poisoning wears down to a regular poisoning once the battle is over.
    registry.register_flag_hook("Toxic", HookKind::OnBattleEnd, |api| {
        api.change_status_condition(StatusCondition::Poison);
    });

    registry.register_flag_hook("Sleep", HookKind::BeforeMove, |api| {
        let name = target_name(api);
        api.show_text(format!("{} is fast asleep.", name));
        if api.participant(api.target()).asleep_rounds == 0 {
            api.show_text(format!("{} woke up!", name));
            api.remove_status_condition();
        } else {
            api.negate_move();
        }
    });

    registry.register_flag_hook("Sleep", HookKind::OnTurnEnd, |api| {
        api.reduce_sleep_counter();
    });
}

// --- MOVES ---

fn register_move_hooks(registry: &mut HookRegistry) {
    // Bottomless fallback: a quarter of the user's max HP as recoil.
    registry.register_move_hook("Struggle", HookKind::OnUse, |api| {
        let max_hp = api.standard_stat(api.user(), Stat::Hp);
        api.damage_with_fixed_recoil(max_hp.div_ceil(4));
    });

    registry.register_move_hook("ThunderWave", HookKind::OnUse, |api| {
        api.add_status_condition(StatusCondition::Paralysis);
    });

    registry.register_move_hook("Toxic", HookKind::OnUse, |api| {
        api.add_status_condition(StatusCondition::Toxic);
    });

    registry.register_move_hook("WillOWisp", HookKind::OnUse, |api| {
        api.add_status_condition(StatusCondition::Burn);
    });

    registry.register_move_hook("Hypnosis", HookKind::OnUse, |api| {
        if api.add_status_condition(StatusCondition::Sleep) {
            let turns = api.random(1, 3);
            api.sleep(turns as u32);
        }
    });

    registry.register_move_hook("Splash", HookKind::OnUse, |api| {
        api.show_text("But nothing happened!");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hooks::EntityKind;
    use rstest::rstest;

    #[rstest]
    #[case(EntityKind::Flag, "Burn", HookKind::OnTurnEnd)]
    #[case(EntityKind::Flag, "Freeze", HookKind::BeforeMove)]
    #[case(EntityKind::Flag, "Paralysis", HookKind::BeforeMove)]
    #[case(EntityKind::Flag, "Poison", HookKind::OnTurnEnd)]
    #[case(EntityKind::Flag, "Toxic", HookKind::OnTurnEnd)]
    #[case(EntityKind::Flag, "Toxic", HookKind::OnSwitchIn)]
    #[case(EntityKind::Flag, "Toxic", HookKind::OnBattleEnd)]
    #[case(EntityKind::Flag, "Sleep", HookKind::BeforeMove)]
    #[case(EntityKind::Flag, "Sleep", HookKind::OnTurnEnd)]
    #[case(EntityKind::Move, "Struggle", HookKind::OnUse)]
    #[case(EntityKind::Move, "Hypnosis", HookKind::OnUse)]
    #[case(EntityKind::Move, "Splash", HookKind::OnUse)]
    fn test_builtin_hook_is_registered(#[case] kind: EntityKind, #[case] entity: &str, #[case] hook: HookKind) {
        let registry = HookRegistry::with_builtin_hooks();
        assert!(registry.contains(kind, entity, &hook));
    }

    #[test]
    fn test_status_flag_ids_match_condition_names() {
        let registry = HookRegistry::with_builtin_hooks();
        for condition in [
            StatusCondition::Burn,
            StatusCondition::Poison,
            StatusCondition::Toxic,
        ] {
            let flag_id = condition.flag_id().unwrap();
            assert!(registry.contains(EntityKind::Flag, flag_id, &HookKind::OnTurnEnd));
        }
    }
}
