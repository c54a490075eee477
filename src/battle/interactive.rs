//! Wild-encounter front end: menus, prompts and end-of-battle narration
//! around a [`BattleController`].

use crate::battle::ai::MoveChoice;
use crate::battle::controller::BattleController;
use crate::battle::input::{InputContexts, LogicalKey, PromptInput, Selection};
use crate::battle::narration::Narration;
use crate::battle::state::{BattleState, BoundMove, ParticipantId, Side};
use crate::battle::task::{AnimatedValue, BattleTask, TaskHost};
use crate::config::BattleConfig;
use crate::errors::BattleResult;
use crate::event_queue::{EventQueue, BATTLE_INTERACTION_EVENT_QUEUE};
use strum::{EnumCount, FromRepr};

pub const ACTION_MENU_CONTEXT: &str = "battle-action-selection";
pub const MOVE_MENU_CONTEXT: &str = "battle-move-selection";

/// Options of the action menu, laid out as a 2x2 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount, FromRepr)]
pub enum MenuAction {
    Fight,
    Bag,
    Pokemon,
    Run,
}

impl MenuAction {
    pub fn from_index(index: usize) -> Option<MenuAction> {
        Self::from_repr(index)
    }
}

/// Steps of the encounter flow run by immediate tasks on the interaction
/// queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionCommand {
    OpenActionMenu,
    HandleActionSelection,
    OpenMoveMenu,
    HandleMoveSelection,
    RunTurn(MoveChoice),
    AfterTurn,
    EndEncounter,
}

/// Where the encounter stands, as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterState {
    NotStarted,
    InProgress,
    Escaped,
    Finished(BattleState),
}

pub struct InteractiveLayer {
    controller: BattleController,
    queue: EventQueue<BattleTask<InteractionCommand>>,
    input: PromptInput,
    encounter: EncounterState,
    frame_time: f32,
}

impl InteractiveLayer {
    pub fn new(controller: BattleController) -> Self {
        Self {
            controller,
            queue: EventQueue::new(),
            input: PromptInput::new(),
            encounter: EncounterState::NotStarted,
            frame_time: 0.0,
        }
    }

    /// Starts the battle and announces the wild opponent.
    pub fn start(&mut self) -> BattleResult<()> {
        self.controller.start_battle()?;
        self.encounter = EncounterState::InProgress;

        let name = self.active_name(Side::Opponent);
        self.enqueue(BattleTask::text(format!("Wild {} appeared!", name)));
        self.enqueue(BattleTask::immediate(InteractionCommand::OpenActionMenu));
        Ok(())
    }

    /// Advances by one host frame: the battle while it has pending events,
    /// the interaction queue otherwise.
    pub fn tick(&mut self, frame_time_ms: f32) {
        self.frame_time = frame_time_ms;
        if self.controller.state() == BattleState::Ready && self.controller.has_pending_events() {
            self.controller.tick(frame_time_ms);
            return;
        }

        let mut queue = std::mem::take(&mut self.queue);
        queue.tick(self);
        let enqueued = std::mem::take(&mut self.queue);
        queue.append(enqueued);
        self.queue = queue;
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.input.press(key);
    }

    pub fn encounter(&self) -> EncounterState {
        self.encounter
    }

    pub fn is_over(&self) -> bool {
        matches!(self.encounter, EncounterState::Escaped | EncounterState::Finished(_))
    }

    /// Whether a selection prompt is waiting for keys.
    pub fn is_prompting(&self) -> bool {
        let contexts = self.controller.input_contexts();
        contexts.is_enabled(ACTION_MENU_CONTEXT) || contexts.is_enabled(MOVE_MENU_CONTEXT)
    }

    pub fn controller(&self) -> &BattleController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BattleController {
        &mut self.controller
    }

    pub fn narration(&self) -> &Narration {
        self.controller.narration()
    }

    pub fn queue_name(&self) -> &'static str {
        BATTLE_INTERACTION_EVENT_QUEUE
    }

    fn enqueue(&mut self, task: BattleTask<InteractionCommand>) {
        self.queue.enqueue(task);
    }

    fn player(&self) -> Option<ParticipantId> {
        self.controller.active(Side::Player)
    }

    fn active_name(&self, side: Side) -> String {
        self.controller
            .active(side)
            .map(|id| self.controller.participant(id).name.clone())
            .unwrap_or_default()
    }

    // --- Flow ---

    fn handle(&mut self, command: InteractionCommand) {
        tracing::trace!(?command, "interaction");
        match command {
            InteractionCommand::OpenActionMenu => {
                self.enqueue(BattleTask::prompt(ACTION_MENU_CONTEXT, MenuAction::COUNT, 2, false));
                self.enqueue(BattleTask::immediate(InteractionCommand::HandleActionSelection));
            }
            InteractionCommand::HandleActionSelection => self.handle_action_selection(),
            InteractionCommand::OpenMoveMenu => {
                let move_count = self
                    .player()
                    .map_or(0, |id| self.controller.participant(id).moves.len());
                self.enqueue(BattleTask::prompt(MOVE_MENU_CONTEXT, move_count, 2, true));
                self.enqueue(BattleTask::immediate(InteractionCommand::HandleMoveSelection));
            }
            InteractionCommand::HandleMoveSelection => self.handle_move_selection(),
            InteractionCommand::RunTurn(choice) => self.run_turn(choice),
            InteractionCommand::AfterTurn => self.after_turn(),
            InteractionCommand::EndEncounter => {
                self.encounter = match self.controller.state() {
                    BattleState::PendingStart => EncounterState::Escaped,
                    state => EncounterState::Finished(state),
                };
                tracing::info!(encounter = ?self.encounter, "encounter over");
            }
        }
    }

    fn handle_action_selection(&mut self) {
        let action = match self.input.take_selection() {
            Some(Selection::Chosen(index)) => MenuAction::from_index(index),
            _ => None,
        };
        match action {
            Some(MenuAction::Fight) => {
                let has_moves = self
                    .player()
                    .is_some_and(|id| self.controller.participant(id).has_usable_moves());
                if has_moves {
                    self.enqueue(BattleTask::immediate(InteractionCommand::OpenMoveMenu));
                } else {
                    let name = self.active_name(Side::Player);
                    self.enqueue(BattleTask::text(format!("{} has no moves left!", name)));
                    self.enqueue(BattleTask::immediate(InteractionCommand::RunTurn(MoveChoice::Fallback)));
                }
            }
            Some(MenuAction::Bag) | Some(MenuAction::Pokemon) => {
                self.enqueue(BattleTask::text("You can't do that right now!"));
                self.enqueue(BattleTask::immediate(InteractionCommand::OpenActionMenu));
            }
            Some(MenuAction::Run) => {
                self.controller.abort();
                self.enqueue(BattleTask::text("Got away safely!"));
                self.enqueue(BattleTask::immediate(InteractionCommand::EndEncounter));
            }
            None => self.enqueue(BattleTask::immediate(InteractionCommand::OpenActionMenu)),
        }
    }

    fn handle_move_selection(&mut self) {
        match self.input.take_selection() {
            Some(Selection::Chosen(slot)) => {
                let pp = self
                    .player()
                    .and_then(|id| self.controller.participant(id).moves.get(slot))
                    .map_or(0, |instance| instance.pp);
                if pp == 0 {
                    self.enqueue(BattleTask::text("That move has no PP left!"));
                    self.enqueue(BattleTask::immediate(InteractionCommand::OpenMoveMenu));
                } else {
                    self.enqueue(BattleTask::immediate(InteractionCommand::RunTurn(MoveChoice::Slot(slot))));
                }
            }
            _ => self.enqueue(BattleTask::immediate(InteractionCommand::OpenActionMenu)),
        }
    }

    fn run_turn(&mut self, choice: MoveChoice) {
        let (Some(player), Some(opponent)) = (self.player(), self.controller.active(Side::Opponent)) else {
            tracing::warn!("turn requested without both active participants");
            return;
        };

        match self.commit_actions(player, opponent, choice) {
            Ok(actions) => {
                self.controller.process_turn(actions);
                self.enqueue(BattleTask::immediate(InteractionCommand::AfterTurn));
            }
            Err(err) => {
                tracing::error!(%err, "could not commit the turn's actions");
                self.controller.abort();
                self.enqueue(BattleTask::immediate(InteractionCommand::EndEncounter));
            }
        }
    }

    fn commit_actions(
        &mut self,
        player: ParticipantId,
        opponent: ParticipantId,
        choice: MoveChoice,
    ) -> BattleResult<Vec<BoundMove>> {
        let player_move = self.controller.bind_move(player, choice)?;
        let opponent_move = self.controller.choose_move_ai(opponent)?;
        Ok(vec![player_move, opponent_move])
    }

    fn after_turn(&mut self) {
        match self.controller.state() {
            BattleState::Ready => self.enqueue(BattleTask::immediate(InteractionCommand::OpenActionMenu)),
            BattleState::Victory => {
                if let (Some(winner), Some(defeated)) = (self.player(), self.controller.active(Side::Opponent)) {
                    match self.controller.experience_for(winner, defeated) {
                        Ok(gain) => {
                            let pokemon = self.controller.participant_mut(winner);
                            pokemon.experience += gain;
                            let text = format!("{} gained {} EXP. Points!", pokemon.name, gain);
                            self.enqueue(BattleTask::text(text));
                        }
                        Err(err) => tracing::warn!(%err, "no experience awarded"),
                    }
                }
                self.enqueue(BattleTask::immediate(InteractionCommand::EndEncounter));
            }
            BattleState::Defeat | BattleState::Draw => {
                self.enqueue(BattleTask::text("You blacked out!"));
                self.enqueue(BattleTask::immediate(InteractionCommand::EndEncounter));
            }
            BattleState::PendingStart => self.enqueue(BattleTask::immediate(InteractionCommand::EndEncounter)),
        }
    }
}

impl TaskHost for InteractiveLayer {
    type Command = InteractionCommand;

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn config(&self) -> &BattleConfig {
        self.controller.config()
    }

    fn narration(&mut self) -> &mut Narration {
        self.controller.narration_mut()
    }

    fn animated_value(&mut self, target: AnimatedValue) -> Option<&mut f32> {
        match target {
            AnimatedValue::Hp(id) => Some(self.controller.participant_mut(id).hp_mut()),
        }
    }

    fn prompt_input(&mut self) -> Option<&mut PromptInput> {
        Some(&mut self.input)
    }

    fn input_contexts(&mut self) -> &mut dyn InputContexts {
        self.controller.input_contexts_mut()
    }

    fn execute(&mut self, command: InteractionCommand) {
        self.handle(command);
    }
}
