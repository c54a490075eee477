use crate::battle::ai::MoveChoice;
use crate::battle::controller::BattleController;
use crate::battle::hooks::HookRegistry;
use crate::battle::input::LogicalKey;
use crate::battle::interactive::InteractiveLayer;
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleState, ParticipantId, Side};
use crate::config::BattleConfig;
use crate::pokemon::{PokemonBuilder, PokemonInst};
use crate::resources::ResourceStore;
use schema::StatusCondition;
use std::collections::VecDeque;
use std::sync::Arc;

/// Frame long enough to finish any text in one tick.
pub const BIG_FRAME_MS: f32 = 10_000.0;

const TICK_LIMIT: usize = 10_000;

/// A builder for creating `PokemonInst` instances for tests with sensible defaults.
///
/// # Example
/// ```ignore
/// let rattata = TestPokemonBuilder::new("Rattata", 3)
///     .with_moves(&["Tackle", "Splash"])
///     .with_status(StatusCondition::Burn)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    inner: PokemonBuilder,
}

impl TestPokemonBuilder {
    pub fn new(species: &str, level: u32) -> Self {
        Self {
            inner: PokemonBuilder::new(species, level),
        }
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.inner = self.inner.with_moves(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.inner = self.inner.with_status(status, 0);
        self
    }

    pub fn asleep_for(mut self, rounds: u32) -> Self {
        self.inner = self.inner.with_status(StatusCondition::Sleep, rounds);
        self
    }

    pub fn with_hp(mut self, hp: f32) -> Self {
        self.inner = self.inner.with_hp(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        self.inner
            .build(&ResourceStore::builtin())
            .expect("test participant should build from the built-in data")
    }
}

/// The level-3 Rattata of the reference fixture: Tackle and Tail Whip.
pub fn fixture_rattata() -> PokemonInst {
    TestPokemonBuilder::new("Rattata", 3).build()
}

/// The level-3 Pidgey of the reference fixture: Tackle only.
pub fn fixture_pidgey() -> PokemonInst {
    TestPokemonBuilder::new("Pidgey", 3).build()
}

/// Creates a started battle with the built-in hooks.
pub fn create_test_battle(player: PokemonInst, opponent: PokemonInst, rng: TurnRng) -> BattleController {
    create_test_battle_with(player, opponent, rng, BattleConfig::default(), HookRegistry::with_builtin_hooks())
}

pub fn create_test_battle_with(
    player: PokemonInst,
    opponent: PokemonInst,
    rng: TurnRng,
    config: BattleConfig,
    hooks: HookRegistry,
) -> BattleController {
    let controller = BattleController::new(vec![player], vec![opponent], ResourceStore::builtin())
        .with_config(config)
        .with_hooks(hooks)
        .with_rng(rng);
    started(controller)
}

/// Creates a started battle between two full rosters.
pub fn create_team_battle(player_team: Vec<PokemonInst>, opponent_team: Vec<PokemonInst>, rng: TurnRng) -> BattleController {
    let controller = BattleController::new(player_team, opponent_team, ResourceStore::builtin())
        .with_hooks(HookRegistry::with_builtin_hooks())
        .with_rng(rng);
    started(controller)
}

/// Creates a started battle that reads its move and species data from `store`.
pub fn create_test_battle_in(
    store: ResourceStore,
    player: PokemonInst,
    opponent: PokemonInst,
    rng: TurnRng,
) -> BattleController {
    let controller = BattleController::new(vec![player], vec![opponent], Arc::new(store))
        .with_hooks(HookRegistry::with_builtin_hooks())
        .with_rng(rng);
    started(controller)
}

fn started(mut controller: BattleController) -> BattleController {
    controller.start_battle().expect("test battle should start");
    controller
}

/// Hits every accuracy check, never crits and rolls the lowest damage.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

pub fn player(controller: &BattleController) -> ParticipantId {
    controller.active(Side::Player).expect("player side has an active participant")
}

pub fn opponent(controller: &BattleController) -> ParticipantId {
    controller.active(Side::Opponent).expect("opponent side has an active participant")
}

/// Commits one move per side and runs the turn until the queues drain.
pub fn play_turn(controller: &mut BattleController, player_choice: MoveChoice, opponent_choice: MoveChoice) {
    let player_move = controller.bind_move(player(controller), player_choice).unwrap();
    let opponent_move = controller.bind_move(opponent(controller), opponent_choice).unwrap();
    controller.process_turn(vec![player_move, opponent_move]);
    run_until_idle(controller);
}

pub fn run_until_idle(controller: &mut BattleController) {
    let mut ticks = 0;
    while controller.state() == BattleState::Ready && controller.has_pending_events() {
        controller.tick(BIG_FRAME_MS);
        ticks += 1;
        assert!(ticks < TICK_LIMIT, "battle queues never drained");
    }
}

pub fn hp(controller: &BattleController, id: ParticipantId) -> f32 {
    controller.participant(id).current_hp()
}

pub fn transcript(controller: &BattleController) -> Vec<String> {
    controller.narration().transcript().to_vec()
}

/// The "X used Y!" lines, in the order they were shown.
pub fn used_lines(controller: &BattleController) -> Vec<String> {
    controller
        .narration()
        .transcript()
        .iter()
        .filter(|line| line.contains(" used "))
        .cloned()
        .collect()
}

pub fn assert_shown(controller: &BattleController, line: &str) {
    let transcript = controller.narration().transcript();
    assert!(
        transcript.iter().any(|shown| shown == line),
        "expected {:?} in transcript {:#?}",
        line,
        transcript
    );
}

pub fn assert_not_shown(controller: &BattleController, line: &str) {
    let transcript = controller.narration().transcript();
    assert!(
        !transcript.iter().any(|shown| shown == line),
        "did not expect {:?} in transcript {:#?}",
        line,
        transcript
    );
}

/// Ticks the layer, pressing one group of keys per prompt that opens.
///
/// Returns once the encounter is over or a prompt is waiting with no keys
/// left to press.
pub fn drive_layer(layer: &mut InteractiveLayer, mut script: VecDeque<Vec<LogicalKey>>) {
    let mut ticks = 0;
    let mut pressed_for_prompt = false;
    while !layer.is_over() {
        if layer.is_prompting() {
            if !pressed_for_prompt {
                let Some(keys) = script.pop_front() else {
                    return;
                };
                for key in keys {
                    layer.press(key);
                }
                pressed_for_prompt = true;
            }
        } else {
            pressed_for_prompt = false;
        }
        layer.tick(BIG_FRAME_MS);
        ticks += 1;
        assert!(ticks < TICK_LIMIT, "encounter never settled");
    }
}
