#[cfg(test)]
mod tests {
    use crate::battle::ai::MoveChoice;
    use crate::battle::hooks::HookRegistry;
    use crate::battle::rng::TurnRng;
    use crate::battle::state::BattleState;
    use crate::battle::state::Side;
    use crate::battle::tests::common::{
        assert_shown, create_team_battle, create_test_battle, create_test_battle_with, fixture_pidgey,
        fixture_rattata, hp, opponent, play_turn, player, predictable_rng, transcript, used_lines, TestPokemonBuilder,
        BIG_FRAME_MS,
    };
    use crate::config::{BattleConfig, DoubleFaintRule};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusCondition;

    #[test]
    fn test_knockout_ends_battle_in_victory() {
        // Arrange: exactly the draws of one Tackle; a second action would exhaust the RNG
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_hp(3.0).build();
        let rng = TurnRng::new_for_test(vec![1, 24, 217]);
        let mut controller = create_test_battle(fixture_rattata(), pidgey, rng);
        let pidgey = opponent(&controller);

        // Act
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // Assert
        assert_eq!(controller.state(), BattleState::Victory);
        assert_eq!(hp(&controller, pidgey), 0.0);
        assert!(controller.participant(pidgey).is_fainted());
        assert_eq!(
            transcript(&controller),
            vec!["Rattata used Tackle!".to_string(), "Foe Pidgey fainted!".to_string()]
        );
    }

    #[test]
    fn test_battle_end_discards_battle_scoped_state() {
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_hp(3.0).build();
        let mut controller = create_test_battle(fixture_rattata(), pidgey, predictable_rng());
        let rattata = player(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert!(!controller.has_pending_events());
        assert!(controller.battle().is_none());
        assert!(controller.volatile(rattata).is_none());
        assert_eq!(controller.turn_number(), None);
    }

    #[test]
    fn test_terminal_state_is_entered_once() {
        let pidgey = TestPokemonBuilder::new("Pidgey", 3).with_hp(3.0).build();
        let mut controller = create_test_battle(fixture_rattata(), pidgey, predictable_rng());
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        let lines = transcript(&controller).len();

        for _ in 0..10 {
            controller.tick(BIG_FRAME_MS);
        }

        assert_eq!(controller.state(), BattleState::Victory);
        assert_eq!(transcript(&controller).len(), lines);
    }

    #[test]
    fn test_player_knockout_is_a_defeat() {
        let rattata = TestPokemonBuilder::new("Rattata", 3).with_hp(2.0).build();
        let mut controller = create_test_battle(rattata, fixture_pidgey(), predictable_rng());
        let pidgey = opponent(&controller);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(controller.state(), BattleState::Defeat);
        assert_eq!(hp(&controller, pidgey), 10.0);
        assert_shown(&controller, "Rattata fainted!");
    }

    #[test]
    fn test_battle_goes_on_while_the_roster_has_members_standing() {
        // Arrange
        let lead = TestPokemonBuilder::new("Rattata", 3)
            .with_moves(&["Splash"])
            .with_hp(1.0)
            .build();
        let bench = fixture_rattata();
        let rng = TurnRng::new_for_test(vec![1, 24, 217, 1, 24, 217, 1, 24, 217]);
        let mut controller = create_team_battle(vec![lead, bench], vec![fixture_pidgey()], rng);
        let (lead, bench) = {
            let roster = controller.roster(Side::Player);
            (roster[0], roster[1])
        };

        // Act
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        // Assert
        assert_eq!(controller.state(), BattleState::Ready);
        assert!(controller.participant(lead).is_fainted());
        assert_eq!(hp(&controller, bench), 15.0);
        assert_eq!(player(&controller), bench);

        // The second member fights and is targeted from now on
        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        assert_shown(&controller, "Rattata used Tackle!");
        assert_eq!(hp(&controller, bench), 10.0);
        assert_eq!(hp(&controller, opponent(&controller)), 10.0);
        assert_eq!(controller.state(), BattleState::Ready);
    }

    #[test]
    fn test_side_loses_once_every_member_has_fainted() {
        let lead = TestPokemonBuilder::new("Rattata", 3)
            .with_moves(&["Splash"])
            .with_hp(1.0)
            .build();
        let bench = TestPokemonBuilder::new("Rattata", 3)
            .with_moves(&["Splash"])
            .with_hp(1.0)
            .build();
        let rng = TurnRng::new_for_test(vec![1, 24, 217, 1, 24, 217]);
        let mut controller = create_team_battle(vec![lead, bench], vec![fixture_pidgey()], rng);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        assert_eq!(controller.state(), BattleState::Ready);

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
        assert_eq!(controller.state(), BattleState::Defeat);
        let faints = transcript(&controller)
            .into_iter()
            .filter(|line| line == "Rattata fainted!")
            .count();
        assert_eq!(faints, 2);
    }

    #[test]
    fn test_repeated_fixed_damage_faints_exactly_once() {
        // Sonic Boom draws accuracy and critical rolls, never a damage roll
        let geodude = TestPokemonBuilder::new("Geodude", 10).with_moves(&["SonicBoom"]).build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 10).with_moves(&["Splash"]).build();
        let mut controller = create_test_battle(geodude, pidgey, TurnRng::new_for_test(vec![1, 24, 1, 24]));
        let pidgey = opponent(&controller);

        let mut hp_after_each_turn = Vec::new();
        while controller.state() == BattleState::Ready {
            play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));
            hp_after_each_turn.push(hp(&controller, pidgey));
            assert!(hp_after_each_turn.len() <= 2, "Pidgey outlived two Sonic Booms");
        }

        assert_eq!(hp_after_each_turn, vec![9.0, 0.0]);
        assert_eq!(controller.state(), BattleState::Victory);
        let lines = transcript(&controller);
        assert_eq!(lines.iter().filter(|line| *line == "Foe Pidgey fainted!").count(), 1);

        for _ in 0..10 {
            controller.tick(BIG_FRAME_MS);
        }
        assert_eq!(controller.state(), BattleState::Victory);
        assert_eq!(transcript(&controller), lines);
        assert_eq!(hp(&controller, pidgey), 0.0);
        assert_eq!(controller.turn_number(), None);
    }

    #[rstest]
    #[case(DoubleFaintRule::FirstChecked, BattleState::Defeat)]
    #[case(DoubleFaintRule::Draw, BattleState::Draw)]
    fn test_double_faint_follows_the_configured_rule(#[case] rule: DoubleFaintRule, #[case] expected: BattleState) {
        // Both poisoned at 1 HP: the end-of-turn damage downs both together
        let rattata = TestPokemonBuilder::new("Rattata", 3)
            .with_moves(&["Splash"])
            .with_status(StatusCondition::Poison)
            .with_hp(1.0)
            .build();
        let pidgey = TestPokemonBuilder::new("Pidgey", 3)
            .with_moves(&["Splash"])
            .with_status(StatusCondition::Poison)
            .with_hp(1.0)
            .build();
        let config = BattleConfig {
            double_faint_rule: rule,
            ..BattleConfig::default()
        };
        let mut controller =
            create_test_battle_with(rattata, pidgey, predictable_rng(), config, HookRegistry::with_builtin_hooks());

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert_eq!(controller.state(), expected);
        let faints: Vec<String> = transcript(&controller)
            .into_iter()
            .filter(|line| line.ends_with("fainted!"))
            .collect();
        assert_eq!(faints, vec!["Rattata fainted!".to_string(), "Foe Pidgey fainted!".to_string()]);
    }

    #[test]
    fn test_participant_at_zero_hp_neither_acts_nor_is_targeted() {
        // No RNG outcomes at all: neither Tackle may run
        let rattata = TestPokemonBuilder::new("Rattata", 3).with_hp(0.0).build();
        let mut controller = create_test_battle(rattata, fixture_pidgey(), TurnRng::new_for_test(vec![]));

        play_turn(&mut controller, MoveChoice::Slot(0), MoveChoice::Slot(0));

        assert!(used_lines(&controller).is_empty());
        assert_eq!(transcript(&controller), vec!["Rattata fainted!".to_string()]);
        assert_eq!(controller.state(), BattleState::Defeat);
    }
}
