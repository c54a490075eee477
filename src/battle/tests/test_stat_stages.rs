#[cfg(test)]
mod tests {
    use crate::battle::ai::MoveChoice;
    use crate::battle::controller::BattleController;
    use crate::battle::hooks::{HookKind, HookRegistry};
    use crate::battle::rng::TurnRng;
    use crate::battle::state::{ParticipantId, MAX_STAGE};
    use crate::battle::tests::common::{
        assert_not_shown, assert_shown, create_test_battle, create_test_battle_in, create_test_battle_with, opponent,
        play_turn, player, predictable_rng, TestPokemonBuilder,
    };
    use crate::config::BattleConfig;
    use crate::resources::ResourceStore;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use schema::Stat;

    /// Rattata knowing only `move_id` against a Pidgey that only splashes.
    fn battle_using(move_id: &str) -> BattleController {
        let rattata = TestPokemonBuilder::new("Rattata", 3).with_moves(&[move_id]).build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_moves(&["Splash"]).build();
        create_test_battle(rattata, pidgey, predictable_rng())
    }

    fn stage(controller: &BattleController, id: ParticipantId, stat: Stat) -> i32 {
        controller.volatile(id).map_or(0, |volatile| volatile.stage(stat))
    }

    #[rstest]
    #[case("TailWhip", Stat::Defense, -1, "Pidgey's DEFENSE fell!")]
    #[case("Growl", Stat::Attack, -1, "Pidgey's ATTACK fell!")]
    #[case("Screech", Stat::Defense, -2, "Pidgey's DEFENSE harshly fell!")]
    #[case("SandAttack", Stat::Accuracy, -1, "Pidgey's ACCURACY fell!")]
    fn test_lowering_moves_hit_the_target(
        #[case] move_id: &str,
        #[case] stat: Stat,
        #[case] expected_stage: i32,
        #[case] text: &str,
    ) {
        let mut controller = battle_using(move_id);
        let (rattata, pidgey) = (player(&controller), opponent(&controller));

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(stage(&controller, pidgey, stat), expected_stage);
        assert_eq!(stage(&controller, rattata, stat), 0);
        assert_shown(&controller, text);
    }

    #[rstest]
    #[case("Harden", Stat::Defense, 1, "Rattata's DEFENSE rose!")]
    #[case("SwordsDance", Stat::Attack, 2, "Rattata's ATTACK rose sharply!")]
    #[case("Agility", Stat::Speed, 2, "Rattata's SPEED rose sharply!")]
    fn test_raising_moves_affect_the_user(
        #[case] move_id: &str,
        #[case] stat: Stat,
        #[case] expected_stage: i32,
        #[case] text: &str,
    ) {
        let mut controller = battle_using(move_id);
        let (rattata, pidgey) = (player(&controller), opponent(&controller));

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(stage(&controller, rattata, stat), expected_stage);
        assert_eq!(stage(&controller, pidgey, stat), 0);
        assert_shown(&controller, text);
    }

    #[test]
    fn test_stage_cannot_rise_past_six() {
        let mut controller = battle_using("Harden");
        let rattata = player(&controller);
        controller.volatile_mut(rattata).set_stage(Stat::Defense, 6);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(stage(&controller, rattata, Stat::Defense), 6);
        assert_shown(&controller, "Rattata's DEFENSE won't go any higher!");
    }

    #[test]
    fn test_stage_cannot_fall_past_minus_six() {
        let mut controller = battle_using("Growl");
        let pidgey = opponent(&controller);
        controller.volatile_mut(pidgey).set_stage(Stat::Attack, -6);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(stage(&controller, pidgey, Stat::Attack), -6);
        assert_shown(&controller, "Pidgey's ATTACK won't go any lower!");
    }

    #[test]
    fn test_partial_raise_clamps_at_six() {
        let mut controller = battle_using("SwordsDance");
        let rattata = player(&controller);
        controller.volatile_mut(rattata).set_stage(Stat::Attack, 5);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(stage(&controller, rattata, Stat::Attack), 6);
        assert_shown(&controller, "Rattata's ATTACK rose sharply!");
    }

    #[test]
    fn test_drop_then_raise_returns_to_neutral() {
        // Rattata hardens first, then Pidgey's Tail Whip takes it back
        let rattata = TestPokemonBuilder::new("Rattata", 3).with_moves(&["Harden"]).build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_moves(&["TailWhip"]).build();
        let mut controller = create_test_battle(rattata, pidgey, predictable_rng());
        let rattata = player(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_shown(&controller, "Rattata's DEFENSE rose!");
        assert_shown(&controller, "Rattata's DEFENSE fell!");
        assert_eq!(stage(&controller, rattata, Stat::Defense), 0);
    }

    /// A battle in which every Splash lowers `stat` by one stage and then
    /// raises it by one, on the user.
    fn lower_then_raise_battle(stat: Stat) -> BattleController {
        let mut hooks = HookRegistry::with_builtin_hooks();
        hooks.register_move_hook("Splash", HookKind::OnUse, move |api| {
            api.lower_stat(stat, 1);
            api.raise_stat(stat, 1);
        });
        let rattata = TestPokemonBuilder::new("Rattata", 3).with_moves(&["Splash"]).build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_moves(&["Splash"]).build();
        create_test_battle_with(rattata, pidgey, predictable_rng(), BattleConfig::default(), hooks)
    }

    fn staged_stat() -> impl Strategy<Value = Stat> {
        prop::sample::select(vec![
            Stat::Attack,
            Stat::Defense,
            Stat::SpecialAttack,
            Stat::SpecialDefense,
            Stat::Speed,
            Stat::Accuracy,
            Stat::Evasion,
        ])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_lower_then_raise_round_trips(stat in staged_stat(), start in -MAX_STAGE..=MAX_STAGE) {
            let mut controller = lower_then_raise_battle(stat);
            let rattata = player(&controller);
            controller.volatile_mut(rattata).set_stage(stat, start);

            play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

            let end = stage(&controller, rattata, stat);
            prop_assert!((-MAX_STAGE..=MAX_STAGE).contains(&end));
            // A drop at the floor is lost, so only the raise lands
            let expected = if start == -MAX_STAGE { start + 1 } else { start };
            prop_assert_eq!(end, expected);
        }
    }

    #[test]
    fn test_self_targeted_move_ignores_the_users_evasion() {
        // An accuracy-checked Harden: at +6 evasion the roll of 50 would miss
        let store = ResourceStore::builtin();
        let mut harden = store.move_data("Harden").unwrap().as_ref().clone();
        harden.accuracy = 100;
        let mut store = store.as_ref().clone();
        store.insert_move(harden);

        let rattata = TestPokemonBuilder::new("Rattata", 3).with_moves(&["Harden"]).build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_moves(&["Splash"]).build();
        let mut controller = create_test_battle_in(store, rattata, pidgey, TurnRng::new_for_test(vec![50]));
        let rattata = player(&controller);
        controller.volatile_mut(rattata).set_stage(Stat::Evasion, 6);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_not_shown(&controller, "Rattata's attack missed!");
        assert_eq!(stage(&controller, rattata, Stat::Defense), 1);
    }

    #[test]
    fn test_stages_scale_the_effective_stat() {
        let mut controller = battle_using("Agility");
        let rattata = player(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // Speed 9 at +2
        assert_eq!(controller.effective_stat(rattata, Stat::Speed), 18.0);
    }
}
