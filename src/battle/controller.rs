use crate::battle::ai::{MoveChoice, MoveChooser, WildBattleAi, FALLBACK_MOVE};
use crate::battle::commands::BattleCommand;
use crate::battle::context::MoveResolutionContext;
use crate::battle::hooks::{HookKind, HookRegistry};
use crate::battle::input::{ContextRegistry, InputContexts};
use crate::battle::narration::Narration;
use crate::battle::rng::{BattleRng, SeededRng};
use crate::battle::script_vars::ScriptVariables;
use crate::battle::state::{
    Battle, BattleState, BoundMove, Flag, FlagBearer, MoveSlotRef, ParticipantId, Side, VolatileData,
};
use crate::battle::stats::{calculate_exp_gain, StageMode};
use crate::battle::task::BattleTask;
use crate::battle::turn_orchestrator::determine_action_order;
use crate::battle::world::{BattleWorld, QueueKind};
use crate::config::BattleConfig;
use crate::errors::BattleResult;
use crate::pokemon::PokemonInst;
use crate::resources::ResourceStore;
use schema::{MoveData, MoveTarget, Stat};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Owns one battle and drives it through its lifecycle:
/// `PendingStart -> Ready -> {Victory | Defeat | Draw}`.
///
/// The player's roster is the owning side.
pub struct BattleController {
    world: BattleWorld,
    chooser: Box<dyn MoveChooser>,
}

impl BattleController {
    /// A controller over the two rosters with the built-in hooks, the default
    /// config and an entropy-seeded RNG.
    pub fn new(player_team: Vec<PokemonInst>, opponent_team: Vec<PokemonInst>, store: Arc<ResourceStore>) -> Self {
        let world = BattleWorld::new(
            player_team,
            opponent_team,
            store,
            Arc::new(HookRegistry::with_builtin_hooks()),
            BattleConfig::default(),
            Box::new(SeededRng::from_entropy()),
            Box::new(ContextRegistry::default()),
        );
        Self {
            world,
            chooser: Box::new(WildBattleAi::new()),
        }
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.world.config = config;
        self
    }

    pub fn with_rng<R: BattleRng + 'static>(mut self, rng: R) -> Self {
        self.world.rng = Box::new(rng);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.world.hooks = Arc::new(hooks);
        self
    }

    pub fn with_move_chooser<C: MoveChooser + 'static>(mut self, chooser: C) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn with_input_contexts<I: InputContexts + 'static>(mut self, contexts: I) -> Self {
        self.world.contexts = Box::new(contexts);
        self
    }

    // --- Lifecycle ---

    /// Resolves every participant's species and moves, attaches fresh
    /// volatile data and creates the battle queues.
    ///
    /// # Panics
    /// If the battle is not in `PendingStart`.
    pub fn start_battle(&mut self) -> BattleResult<()> {
        assert_eq!(
            self.world.state,
            BattleState::PendingStart,
            "start_battle requires a battle in PendingStart"
        );

        let mut species = BTreeMap::new();
        let mut move_lists = BTreeMap::new();
        for id in self.world.roster_order() {
            let pokemon = self.world.participant(id);
            species.insert(id, self.world.store.species(&pokemon.species)?);
            let moves = pokemon
                .moves
                .iter()
                .map(|instance| self.world.store.move_data(&instance.move_id))
                .collect::<Result<Vec<Arc<MoveData>>, _>>()?;
            move_lists.insert(id, moves);
        }

        self.world.volatile = species.keys().map(|&id| (id, VolatileData::new())).collect();
        // Conditions carried into the battle get their hooks back.
        for id in self.world.roster_order() {
            if let Some(flag_id) = self.world.participant(id).status.flag_id() {
                let flag = Flag::new(flag_id, FlagBearer::Participant(id), -1);
                self.world.volatile_mut(id).flags.push(flag);
            }
        }
        self.world.species = species;
        self.world.move_lists = move_lists;
        self.world.battle = Some(Battle::new());
        self.world.create_queues();
        self.world.state = BattleState::Ready;

        tracing::info!(
            player = ?self.world.roster(Side::Player),
            opponent = ?self.world.roster(Side::Opponent),
            "battle started"
        );
        Ok(())
    }

    /// Returns to `PendingStart`, discarding the queues without running
    /// their tasks. Changes already applied to participants stay.
    pub fn abort(&mut self) {
        self.world.drop_queues();
        self.world.battle = None;
        self.world.volatile.clear();
        self.world.species.clear();
        self.world.move_lists.clear();
        self.world.state = BattleState::PendingStart;
        tracing::info!("battle aborted");
    }

    /// Advances the battle by one host frame. The in-move queue drains
    /// before the battle queue moves on. A no-op outside `Ready`.
    pub fn tick(&mut self, frame_time_ms: f32) {
        if self.world.state != BattleState::Ready {
            return;
        }
        self.world.frame_time = frame_time_ms;
        if self.world.queue_is_empty(QueueKind::Move) {
            self.world.tick_queue(QueueKind::Battle);
        } else {
            self.world.tick_queue(QueueKind::Move);
        }
    }

    pub fn has_pending_events(&self) -> bool {
        self.world.has_pending_events()
    }

    pub fn state(&self) -> BattleState {
        self.world.state
    }

    /// Orders the committed actions, fires `onTurnStart` and queues the
    /// resolution of every action followed by the end of the turn.
    ///
    /// # Panics
    /// If the battle is not `Ready`.
    pub fn process_turn(&mut self, actions: Vec<BoundMove>) {
        assert_eq!(self.world.state, BattleState::Ready, "process_turn requires a Ready battle");

        let ordered = determine_action_order(&mut self.world, actions);
        if let Some(battle) = self.world.battle.as_mut() {
            battle.used_moves = ordered.clone();
        }
        self.world.trigger_event(&HookKind::OnTurnStart);

        for action in ordered {
            self.world
                .enqueue(QueueKind::Battle, BattleTask::immediate(BattleCommand::ResolveMove(action)));
        }
        self.world.enqueue(QueueKind::Battle, BattleTask::immediate(BattleCommand::EndTurn));
    }

    /// Asks the move chooser for `user`'s move.
    ///
    /// # Panics
    /// If the battle is not `Ready`.
    pub fn choose_move_ai(&mut self, user: ParticipantId) -> BattleResult<BoundMove> {
        assert_eq!(self.world.state, BattleState::Ready, "choose_move_ai requires a Ready battle");

        let mut ctx = MoveResolutionContext::for_flag(user);
        if let Some(target) = self.world.active(self.world.side_of(user).opponent()) {
            ctx.target = target;
        }
        self.world.prepare_script_variables(&ctx);
        let choice = self
            .chooser
            .choose_move_wild_battle(&self.world.variables, self.world.rng.as_mut());
        tracing::debug!(%user, ?choice, "AI chose");
        self.bind_move(user, choice)
    }

    /// Turns a move choice into a committed action against the opposing
    /// active participant, or against the user for self-targeting moves.
    ///
    /// # Panics
    /// If the slot is out of range for the user.
    pub fn bind_move(&self, user: ParticipantId, choice: MoveChoice) -> BattleResult<BoundMove> {
        let (move_data, slot) = match choice {
            MoveChoice::Slot(index) => {
                let pokemon = self.world.participant(user);
                assert!(index < pokemon.moves.len(), "{} has no move slot {}", pokemon.name, index);
                let data = match self.world.move_list(user).get(index) {
                    Some(data) => Arc::clone(data),
                    None => self.world.store.move_data(&pokemon.moves[index].move_id)?,
                };
                (data, MoveSlotRef::Slot(index))
            }
            MoveChoice::Fallback => (self.world.store.move_data(FALLBACK_MOVE)?, MoveSlotRef::Fallback),
        };

        let target = match move_data.target {
            MoveTarget::User => user,
            _ => self
                .world
                .active(self.world.side_of(user).opponent())
                .unwrap_or(user),
        };
        Ok(BoundMove {
            user,
            target,
            move_data,
            slot,
        })
    }

    /// Experience `winner` earns for defeating `defeated`.
    pub fn experience_for(&self, winner: ParticipantId, defeated: ParticipantId) -> BattleResult<u32> {
        let defeated_pokemon = self.world.participant(defeated);
        let base_exp = self.world.store.species(&defeated_pokemon.species)?.base_exp;
        let gain = calculate_exp_gain(
            self.world.participant(winner).level,
            defeated_pokemon.level,
            base_exp,
            self.world.config.exp_share_factor,
            self.world.config.exp_item_multiplier,
        );
        Ok(gain.floor() as u32)
    }

    // --- Queries ---

    pub fn world(&self) -> &BattleWorld {
        &self.world
    }

    pub fn active(&self, side: Side) -> Option<ParticipantId> {
        self.world.active(side)
    }

    pub fn roster(&self, side: Side) -> &[ParticipantId] {
        self.world.roster(side)
    }

    pub fn participant(&self, id: ParticipantId) -> &PokemonInst {
        self.world.participant(id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> &mut PokemonInst {
        self.world.participant_mut(id)
    }

    pub fn volatile(&self, id: ParticipantId) -> Option<&VolatileData> {
        self.world.volatile(id)
    }

    pub fn volatile_mut(&mut self, id: ParticipantId) -> &mut VolatileData {
        self.world.volatile_mut(id)
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.world.battle.as_ref()
    }

    pub fn narration(&self) -> &Narration {
        &self.world.narration
    }

    pub(crate) fn narration_mut(&mut self) -> &mut Narration {
        &mut self.world.narration
    }

    pub(crate) fn input_contexts_mut(&mut self) -> &mut dyn InputContexts {
        self.world.contexts.as_mut()
    }

    pub fn input_contexts(&self) -> &dyn InputContexts {
        self.world.contexts.as_ref()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.world.config
    }

    pub fn variables(&self) -> &ScriptVariables {
        self.world.variables()
    }

    pub fn effective_stat(&self, id: ParticipantId, stat: Stat) -> f64 {
        self.world.effective_stat(id, stat, StageMode::All)
    }

    pub fn turn_number(&self) -> Option<u32> {
        self.battle().map(|battle| battle.turn_number)
    }
}
