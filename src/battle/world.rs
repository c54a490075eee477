// In: src/battle/world.rs

use crate::battle::commands::BattleCommand;
use crate::battle::context::MoveResolutionContext;
use crate::battle::hooks::HookRegistry;
use crate::battle::input::{InputContexts, PromptInput};
use crate::battle::narration::Narration;
use crate::battle::rng::BattleRng;
use crate::battle::script_vars::ScriptVariables;
use crate::battle::state::{Battle, BattleState, ParticipantId, Side, VolatileData};
use crate::battle::stats::{effective_stat, StageMode};
use crate::battle::task::{AnimatedValue, BattleTask, TaskHost};
use crate::config::BattleConfig;
use crate::event_queue::{EventQueue, BATTLE_EVENT_QUEUE, MOVE_EVENT_QUEUE};
use crate::pokemon::PokemonInst;
use crate::resources::ResourceStore;
use schema::{MoveData, SpeciesData, Stat};
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) type BattleQueue = EventQueue<BattleTask<BattleCommand>>;

/// The two battle-scoped queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// Outer battle flow: action resolution and end-of-turn bookkeeping.
    Battle,
    /// Narration and animation of the move being resolved. Drains first.
    Move,
}

impl QueueKind {
    pub fn resource_key(self) -> &'static str {
        match self {
            QueueKind::Battle => BATTLE_EVENT_QUEUE,
            QueueKind::Move => MOVE_EVENT_QUEUE,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct BattleQueues {
    battle: BattleQueue,
    moves: BattleQueue,
}

impl BattleQueues {
    fn get_mut(&mut self, kind: QueueKind) -> &mut BattleQueue {
        match kind {
            QueueKind::Battle => &mut self.battle,
            QueueKind::Move => &mut self.moves,
        }
    }

    fn get(&self, kind: QueueKind) -> &BattleQueue {
        match kind {
            QueueKind::Battle => &self.battle,
            QueueKind::Move => &self.moves,
        }
    }
}

/// All battle state: the participant arena, the per-id side tables, the
/// live battle record and its queues.
///
/// Participants are addressed by [`ParticipantId`]; every battle-scoped
/// table is keyed by that id.
pub struct BattleWorld {
    pub(crate) config: BattleConfig,
    pub(crate) store: Arc<ResourceStore>,
    pub(crate) hooks: Arc<HookRegistry>,
    pub(crate) rng: Box<dyn BattleRng>,
    pub(crate) state: BattleState,
    pub(crate) participants: Vec<PokemonInst>,
    pub(crate) rosters: [Vec<ParticipantId>; 2],
    pub(crate) battle: Option<Battle>,
    pub(crate) volatile: BTreeMap<ParticipantId, VolatileData>,
    pub(crate) species: BTreeMap<ParticipantId, Arc<SpeciesData>>,
    pub(crate) move_lists: BTreeMap<ParticipantId, Vec<Arc<MoveData>>>,
    pub(crate) queues: Option<BattleQueues>,
    pub(crate) narration: Narration,
    pub(crate) variables: ScriptVariables,
    pub(crate) contexts: Box<dyn InputContexts>,
    pub(crate) frame_time: f32,
}

impl BattleWorld {
    pub(crate) fn new(
        player_team: Vec<PokemonInst>,
        opponent_team: Vec<PokemonInst>,
        store: Arc<ResourceStore>,
        hooks: Arc<HookRegistry>,
        config: BattleConfig,
        rng: Box<dyn BattleRng>,
        contexts: Box<dyn InputContexts>,
    ) -> Self {
        let player_count = player_team.len();
        let participants: Vec<PokemonInst> = player_team.into_iter().chain(opponent_team).collect();
        let player_roster = (0..player_count).map(ParticipantId::new).collect();
        let opponent_roster = (player_count..participants.len()).map(ParticipantId::new).collect();

        Self {
            config,
            store,
            hooks,
            rng,
            state: BattleState::PendingStart,
            participants,
            rosters: [player_roster, opponent_roster],
            battle: None,
            volatile: BTreeMap::new(),
            species: BTreeMap::new(),
            move_lists: BTreeMap::new(),
            queues: None,
            narration: Narration::new(),
            variables: ScriptVariables::new(),
            contexts,
            frame_time: 0.0,
        }
    }

    // --- Participants ---

    pub fn participant(&self, id: ParticipantId) -> &PokemonInst {
        &self.participants[id.index()]
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> &mut PokemonInst {
        &mut self.participants[id.index()]
    }

    pub fn roster(&self, side: Side) -> &[ParticipantId] {
        &self.rosters[side.to_index()]
    }

    /// Every participant, player roster first.
    pub fn roster_order(&self) -> Vec<ParticipantId> {
        self.rosters.iter().flatten().copied().collect()
    }

    /// The participant fighting for `side`: the first roster entry still
    /// standing, or the last entry once the whole roster has fainted.
    pub fn active(&self, side: Side) -> Option<ParticipantId> {
        let roster = self.roster(side);
        roster
            .iter()
            .copied()
            .find(|&id| !self.participant(id).is_fainted())
            .or_else(|| roster.last().copied())
    }

    /// Whether every participant on `side` has fainted.
    pub fn side_defeated(&self, side: Side) -> bool {
        let roster = self.roster(side);
        !roster.is_empty() && roster.iter().all(|&id| self.participant(id).is_fainted())
    }

    pub fn side_of(&self, id: ParticipantId) -> Side {
        if self.rosters[0].contains(&id) {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// Index of `id` within its own roster.
    pub fn roster_index(&self, id: ParticipantId) -> usize {
        self.roster(self.side_of(id))
            .iter()
            .position(|&member| member == id)
            .unwrap_or(0)
    }

    /// Name used in move narration, with the foe prefix on the opposing side.
    pub fn narration_name(&self, id: ParticipantId) -> String {
        let name = &self.participant(id).name;
        match self.side_of(id) {
            Side::Player => name.clone(),
            Side::Opponent => format!("{}{}", self.config.foe_prefix, name),
        }
    }

    pub fn volatile(&self, id: ParticipantId) -> Option<&VolatileData> {
        self.volatile.get(&id)
    }

    pub(crate) fn volatile_mut(&mut self, id: ParticipantId) -> &mut VolatileData {
        self.volatile.entry(id).or_default()
    }

    pub fn species_of(&self, id: ParticipantId) -> Option<&Arc<SpeciesData>> {
        self.species.get(&id)
    }

    pub fn move_list(&self, id: ParticipantId) -> &[Arc<MoveData>] {
        self.move_lists.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stage-adjusted stat of a participant.
    pub fn effective_stat(&self, id: ParticipantId, stat: Stat, mode: StageMode) -> f64 {
        let pokemon = self.participant(id);
        match self.volatile.get(&id) {
            Some(volatile) => effective_stat(pokemon, volatile, stat, mode),
            None => effective_stat(pokemon, &VolatileData::default(), stat, mode),
        }
    }

    // --- Queues ---

    pub(crate) fn enqueue(&mut self, kind: QueueKind, task: BattleTask<BattleCommand>) {
        match self.queues.as_mut() {
            Some(queues) => {
                tracing::trace!(queue = kind.resource_key(), "enqueue");
                queues.get_mut(kind).enqueue(task);
            }
            None => tracing::warn!(queue = kind.resource_key(), "no battle running; task dropped"),
        }
    }

    /// Queues a text line on the in-move queue.
    pub(crate) fn show_text(&mut self, text: impl Into<String>) {
        self.enqueue(QueueKind::Move, BattleTask::text(text));
    }

    pub(crate) fn queue_is_empty(&self, kind: QueueKind) -> bool {
        self.queues
            .as_ref()
            .map_or(true, |queues| queues.get(kind).is_empty())
    }

    pub fn has_pending_events(&self) -> bool {
        !self.queue_is_empty(QueueKind::Move) || !self.queue_is_empty(QueueKind::Battle)
    }

    /// Ticks one queue with this world as the task host.
    ///
    /// The queue is taken out while it runs so tasks can enqueue onto it;
    /// anything enqueued meanwhile is appended behind the remaining tasks. If
    /// the battle ended during the tick, the queue is dropped with it.
    pub(crate) fn tick_queue(&mut self, kind: QueueKind) {
        let Some(queues) = self.queues.as_mut() else {
            return;
        };
        let mut queue = std::mem::take(queues.get_mut(kind));
        queue.tick(self);

        if let Some(queues) = self.queues.as_mut() {
            let enqueued = std::mem::take(queues.get_mut(kind));
            queue.append(enqueued);
            *queues.get_mut(kind) = queue;
        }
    }

    /// Discards both battle queues without running their tasks.
    pub(crate) fn drop_queues(&mut self) {
        self.queues = None;
    }

    pub(crate) fn create_queues(&mut self) {
        self.queues = Some(BattleQueues::default());
    }

    // --- Script variables ---

    /// Mirrors roster, pointer and move fields into the script variables.
    pub(crate) fn prepare_script_variables(&mut self, ctx: &MoveResolutionContext) {
        let mut variables = std::mem::take(&mut self.variables);
        variables.sync_roster(self);
        variables.set_pointers(self.variable_prefix(ctx.user), self.variable_prefix(ctx.target));
        variables.sync_move(ctx.move_data());
        self.variables = variables;
    }

    /// `playerTeam[0]`-style prefix of a participant's variables.
    pub fn variable_prefix(&self, id: ParticipantId) -> String {
        format!("{}[{}]", self.side_of(id).team_variable(), self.roster_index(id))
    }

    pub fn variables(&self) -> &ScriptVariables {
        &self.variables
    }
}

impl TaskHost for BattleWorld {
    type Command = BattleCommand;

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn config(&self) -> &BattleConfig {
        &self.config
    }

    fn narration(&mut self) -> &mut Narration {
        &mut self.narration
    }

    fn animated_value(&mut self, target: AnimatedValue) -> Option<&mut f32> {
        match target {
            AnimatedValue::Hp(id) => self.participants.get_mut(id.index()).map(PokemonInst::hp_mut),
        }
    }

    fn prompt_input(&mut self) -> Option<&mut PromptInput> {
        None
    }

    fn input_contexts(&mut self) -> &mut dyn InputContexts {
        self.contexts.as_mut()
    }

    fn execute(&mut self, command: BattleCommand) {
        self.execute_command(command);
    }
}
