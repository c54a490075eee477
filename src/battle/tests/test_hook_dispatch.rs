#[cfg(test)]
mod tests {
    use crate::battle::ai::MoveChoice;
    use crate::battle::controller::BattleController;
    use crate::battle::hooks::{HookKind, HookRegistry};
    use crate::battle::rng::TurnRng;
    use crate::battle::state::{Flag, FlagBearer, ParticipantId};
    use crate::battle::tests::common::{
        create_test_battle_with, hp, opponent, play_turn, player, predictable_rng, TestPokemonBuilder,
    };
    use crate::config::BattleConfig;
    use crate::pokemon::PokemonInst;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn drain(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    fn knowing(species: &str, moves: &[&str]) -> PokemonInst {
        TestPokemonBuilder::new(species, 3).with_moves(moves).build()
    }

    fn battle(player: PokemonInst, opponent: PokemonInst, rng: TurnRng, hooks: HookRegistry) -> BattleController {
        create_test_battle_with(player, opponent, rng, BattleConfig::default(), hooks)
    }

    fn attach(controller: &mut BattleController, id: ParticipantId, flag: &str) {
        controller
            .volatile_mut(id)
            .flags
            .push(Flag::new(flag, FlagBearer::Participant(id), -1));
    }

    #[test]
    fn test_turn_hooks_fire_moves_then_positions_then_participants() {
        // Arrange
        let log = new_log();
        let mut hooks = HookRegistry::with_builtin_hooks();
        let move_log = Arc::clone(&log);
        hooks.register_move_hook("Splash", HookKind::OnTurnStart, move |api| {
            let name = api.participant(api.user()).name.clone();
            move_log.lock().unwrap().push(format!("move:Splash:{}", name));
        });
        let focus_log = Arc::clone(&log);
        hooks.register_flag_hook("Focus", HookKind::OnTurnStart, move |api| {
            let name = api.participant(api.target()).name.clone();
            focus_log.lock().unwrap().push(format!("flag:Focus:{}", name));
        });
        // Each Focus bearer raises a Mist over its own side at the end of the turn
        hooks.register_flag_hook("Focus", HookKind::OnTurnEnd, |api| {
            let side = api.side_of(api.target());
            api.add_position_flag(side, "Mist", 3);
        });
        let mist_log = Arc::clone(&log);
        hooks.register_flag_hook("Mist", HookKind::OnTurnStart, move |api| {
            let name = api.participant(api.target()).name.clone();
            mist_log.lock().unwrap().push(format!("position:Mist:{}", name));
        });

        let mut controller = battle(
            knowing("Rattata", &["Splash"]),
            knowing("Pidgey", &["Splash"]),
            predictable_rng(),
            hooks,
        );
        let (rattata, pidgey) = (player(&controller), opponent(&controller));
        attach(&mut controller, rattata, "Focus");
        attach(&mut controller, pidgey, "Focus");

        // Act
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        assert_eq!(
            drain(&log),
            vec!["move:Splash:Rattata", "move:Splash:Pidgey", "flag:Focus:Rattata", "flag:Focus:Pidgey"]
        );
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // Assert
        assert_eq!(
            drain(&log),
            vec![
                "move:Splash:Rattata",
                "move:Splash:Pidgey",
                "position:Mist:Rattata",
                "position:Mist:Pidgey",
                "flag:Focus:Rattata",
                "flag:Focus:Pidgey",
            ]
        );
    }

    #[test]
    fn test_flag_removed_mid_dispatch_does_not_fire() {
        let log = new_log();
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_flag_hook("Alpha", HookKind::OnTurnEnd, |api| {
            api.remove_flag_target("Beta");
        });
        let beta_log = Arc::clone(&log);
        hooks.register_flag_hook("Beta", HookKind::OnTurnEnd, move |_api| {
            beta_log.lock().unwrap().push("Beta".to_string());
        });

        let mut controller = battle(
            knowing("Rattata", &["Splash"]),
            knowing("Pidgey", &["Splash"]),
            predictable_rng(),
            hooks,
        );
        let rattata = player(&controller);
        attach(&mut controller, rattata, "Alpha");
        attach(&mut controller, rattata, "Beta");

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert!(drain(&log).is_empty());
        assert!(!controller.volatile(rattata).unwrap().has_flag("Beta"));
        assert!(controller.volatile(rattata).unwrap().has_flag("Alpha"));
    }

    #[test]
    fn test_before_damage_hook_scales_damage() {
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_move_hook("Tackle", HookKind::BeforeDamageInflict, |api| {
            api.multiply_damage(2.0);
        });
        let mut controller = battle(
            knowing("Rattata", &["Tackle"]),
            knowing("Pidgey", &["Splash"]),
            TurnRng::new_for_test(vec![1, 24, 217]),
            hooks,
        );
        let pidgey = opponent(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // floor(4 * 217/255 * 1.5) = 5, doubled after flooring
        assert_eq!(hp(&controller, pidgey), 5.0);
    }

    #[test]
    fn test_damage_scaling_applies_to_the_floored_damage() {
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_move_hook("Tackle", HookKind::BeforeDamageInflict, |api| {
            api.multiply_damage(0.75);
        });
        let mut controller = battle(
            knowing("Rattata", &["Tackle"]),
            knowing("Pidgey", &["Splash"]),
            TurnRng::new_for_test(vec![1, 24, 240]),
            hooks,
        );
        let pidgey = opponent(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // floor(4 * 240/255 * 1.5) = 5, then floor(5 * 0.75) = 3
        assert_eq!(hp(&controller, pidgey), 12.0);
    }

    #[test]
    fn test_before_move_hook_can_negate() {
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_flag_hook("Flinch", HookKind::BeforeMove, |api| {
            api.show_text("It flinched!");
            api.negate_move();
        });
        let mut controller = battle(
            knowing("Rattata", &["Tackle"]),
            knowing("Pidgey", &["Splash"]),
            TurnRng::new_for_test(vec![]),
            hooks,
        );
        let (rattata, pidgey) = (player(&controller), opponent(&controller));
        attach(&mut controller, rattata, "Flinch");

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(hp(&controller, pidgey), 15.0);
        assert_eq!(controller.participant(rattata).moves[0].pp, 35);
    }

    #[test]
    fn test_active_move_keeps_receiving_turn_hooks() {
        let log = new_log();
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_move_hook("Splash", HookKind::OnUse, |api| {
            api.keep_move_active(2);
        });
        let splash_log = Arc::clone(&log);
        hooks.register_move_hook("Splash", HookKind::OnTurnEnd, move |_api| {
            splash_log.lock().unwrap().push("Splash".to_string());
        });
        let mut controller = battle(
            knowing("Rattata", &["Splash", "Harden"]),
            knowing("Pidgey", &["Harden"]),
            predictable_rng(),
            hooks,
        );

        // As an active move and as a move used this turn
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        assert_eq!(drain(&log).len(), 2);

        play_turn(&mut controller, MoveChoice::Slot(1), MoveChoice::Slot(0));
        assert_eq!(drain(&log).len(), 1);

        play_turn(&mut controller, MoveChoice::Slot(1), MoveChoice::Slot(0));
        assert!(drain(&log).is_empty());
        assert!(controller.battle().unwrap().active_moves.is_empty());
    }
}
