use crate::battle::context::MoveResolutionContext;
use crate::battle::hooks::HookKind;
use crate::battle::move_effects::apply_move_function;
use crate::battle::state::{BattleState, BoundMove, Flag, MoveSlotRef, Side, VolatileData};
use crate::battle::stats::{is_critical_hit, move_misses};
use crate::battle::task::BattleTask;
use crate::battle::world::{BattleWorld, QueueKind};
use crate::config::DoubleFaintRule;
use schema::MoveCategory;

/// Battle flow steps run by immediate tasks on the battle queues.
#[derive(Debug, Clone)]
pub enum BattleCommand {
    /// Fire `beforeMove` for one action and queue its execution.
    ResolveMove(BoundMove),
    /// The queued continuation of [`BattleCommand::ResolveMove`].
    ExecuteMove(MoveResolutionContext),
    /// Tag every participant at 0 HP as fainted and queue the outcome check.
    CheckFainted,
    /// End the battle if a whole roster has fainted; otherwise send in the
    /// next participant for each listed side.
    ResolveOutcome(Vec<Side>),
    /// Fire `onTurnEnd` and advance durations and the turn counter.
    EndTurn,
}

impl BattleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BattleCommand::ResolveMove(_) => "ResolveMove",
            BattleCommand::ExecuteMove(_) => "ExecuteMove",
            BattleCommand::CheckFainted => "CheckFainted",
            BattleCommand::ResolveOutcome(_) => "ResolveOutcome",
            BattleCommand::EndTurn => "EndTurn",
        }
    }
}

/// Counts down timed flags, dropping those that run out.
fn tick_flag_durations(flags: &mut Vec<Flag>) {
    flags.retain_mut(|flag| match flag.remaining.as_mut() {
        Some(remaining) => {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        }
        None => true,
    });
}

impl BattleWorld {
    pub(crate) fn execute_command(&mut self, command: BattleCommand) {
        tracing::trace!(command = command.name(), "execute");
        match command {
            BattleCommand::ResolveMove(bound) => self.resolve_move(bound),
            BattleCommand::ExecuteMove(ctx) => self.execute_move(ctx),
            BattleCommand::CheckFainted => self.check_fainted(),
            BattleCommand::ResolveOutcome(replaced) => self.resolve_outcome(replaced),
            BattleCommand::EndTurn => self.end_turn(),
        }
    }

    fn resolve_move(&mut self, bound: BoundMove) {
        let user_down = self.participant(bound.user).is_down();
        let target_down = bound.target != bound.user && self.participant(bound.target).is_down();
        if user_down || target_down {
            tracing::debug!(user = %bound.user, move_id = bound.move_id(), "skipping action of a downed participant");
            return;
        }

        let mut ctx = MoveResolutionContext::for_move(&bound);
        self.trigger_user_events(&mut ctx, &HookKind::BeforeMove);
        self.enqueue(QueueKind::Move, BattleTask::immediate(BattleCommand::ExecuteMove(ctx)));
    }

    fn execute_move(&mut self, mut ctx: MoveResolutionContext) {
        if ctx.negated {
            tracing::debug!(user = %ctx.user, "move negated");
            return;
        }
        let Some(data) = ctx.move_data.clone() else {
            return;
        };

        let text = format!("{} used {}!", self.narration_name(ctx.user), data.display_name);
        self.show_text(text);
        if let Some(MoveSlotRef::Slot(index)) = ctx.slot {
            if let Some(slot) = self.participant_mut(ctx.user).moves.get_mut(index) {
                slot.use_pp();
            }
        }

        let neutral = VolatileData::default();
        let attacker = self.volatile.get(&ctx.user).unwrap_or(&neutral);
        // A move aimed at its own user is not dodged by the user's evasion.
        let defender = if ctx.target == ctx.user {
            &neutral
        } else {
            self.volatile.get(&ctx.target).unwrap_or(&neutral)
        };
        let critical_hit_stage = attacker.critical_hit_stage;
        if move_misses(&data, attacker, defender, self.rng.as_mut()) {
            let text = format!("{}'s attack missed!", self.narration_name(ctx.user));
            self.show_text(text);
            return;
        }

        if !ctx.critical && data.category != MoveCategory::Status {
            ctx.critical = is_critical_hit(critical_hit_stage, self.rng.as_mut());
        }

        apply_move_function(self, &mut ctx);
        self.enqueue(QueueKind::Move, BattleTask::immediate(BattleCommand::CheckFainted));
    }

    fn check_fainted(&mut self) {
        let newly_down: Vec<_> = self
            .roster_order()
            .into_iter()
            .filter(|&id| {
                let pokemon = self.participant(id);
                pokemon.is_down() && !pokemon.is_fainted()
            })
            .collect();
        if newly_down.is_empty() {
            return;
        }

        let replaced: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|&side| self.active(side).is_some_and(|id| newly_down.contains(&id)))
            .collect();
        for id in newly_down {
            self.participant_mut(id).fainted = true;
            tracing::debug!(participant = %id, "fainted");
            let text = format!("{} fainted!", self.narration_name(id));
            self.show_text(text);
        }
        self.enqueue(QueueKind::Move, BattleTask::immediate(BattleCommand::ResolveOutcome(replaced)));
    }

    fn resolve_outcome(&mut self, replaced: Vec<Side>) {
        let [player_lost, opponent_lost] = Side::BOTH.map(|side| self.side_defeated(side));

        let outcome = match (player_lost, opponent_lost) {
            (false, false) => {
                for side in replaced {
                    if let Some(id) = self.active(side) {
                        tracing::debug!(participant = %id, ?side, "sent in");
                        self.trigger_participant_event(&[id], &HookKind::OnSwitchIn);
                    }
                }
                return;
            }
            (true, false) => BattleState::Defeat,
            (false, true) => BattleState::Victory,
            (true, true) => match self.config.double_faint_rule {
                // The player's roster is checked first.
                DoubleFaintRule::FirstChecked => BattleState::Defeat,
                DoubleFaintRule::Draw => BattleState::Draw,
            },
        };
        self.finish_battle(outcome);
    }

    /// Enters a terminal state, discarding the queues and battle-scoped data.
    /// Every participant's flags see `onBattleEnd` first.
    pub(crate) fn finish_battle(&mut self, outcome: BattleState) {
        let turn = self.battle.as_ref().map_or(0, |battle| battle.turn_number);
        let everyone = self.roster_order();
        self.trigger_participant_event(&everyone, &HookKind::OnBattleEnd);
        self.state = outcome;
        self.drop_queues();
        self.battle = None;
        self.volatile.clear();
        tracing::info!(?outcome, turn, "battle finished");
    }

    fn end_turn(&mut self) {
        self.trigger_event(&HookKind::OnTurnEnd);

        if let Some(battle) = self.battle.as_mut() {
            battle.active_moves.retain_mut(|active| {
                active.remaining = active.remaining.saturating_sub(1);
                active.remaining > 0
            });
            battle.used_moves.clear();
            tick_flag_durations(&mut battle.position_flags);
            battle.turn_number += 1;
            tracing::debug!(turn = battle.turn_number, "turn ended");
        }
        for volatile in self.volatile.values_mut() {
            tick_flag_durations(&mut volatile.flags);
        }

        self.enqueue(QueueKind::Move, BattleTask::immediate(BattleCommand::CheckFainted));
    }
}
