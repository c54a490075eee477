//! The callback surface hooks use to act on the battle.
//!
//! Every call works on the move resolution context the hook was fired with.
//! State changes apply immediately; anything visible is queued.

use crate::battle::context::MoveResolutionContext;
use crate::battle::move_effects::{damage_effects, stat_effects, status_effects};
use crate::battle::script_vars::ScriptVariables;
use crate::battle::state::{ActiveMove, BoundMove, Flag, FlagBearer, MoveSlotRef, ParticipantId, Side};
use crate::battle::stats::StageMode;
use crate::battle::world::BattleWorld;
use crate::pokemon::PokemonInst;
use schema::{MoveData, Stat, StatusCondition};
use serde_json::Value;
use std::sync::Arc;

/// The flag whose hook is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagHandle {
    pub id: String,
    pub bearer: FlagBearer,
}

pub struct NativeApi<'a> {
    world: &'a mut BattleWorld,
    ctx: &'a mut MoveResolutionContext,
    flag: Option<FlagHandle>,
}

impl<'a> NativeApi<'a> {
    pub(crate) fn new(world: &'a mut BattleWorld, ctx: &'a mut MoveResolutionContext, flag: Option<FlagHandle>) -> Self {
        Self { world, ctx, flag }
    }

    // --- Move context ---

    pub fn user(&self) -> ParticipantId {
        self.ctx.user
    }

    pub fn target(&self) -> ParticipantId {
        self.ctx.target
    }

    pub fn move_data(&self) -> Option<&MoveData> {
        self.ctx.move_data()
    }

    pub fn participant(&self, id: ParticipantId) -> &PokemonInst {
        self.world.participant(id)
    }

    pub fn context(&self) -> &MoveResolutionContext {
        self.ctx
    }

    pub fn is_negated(&self) -> bool {
        self.ctx.negated
    }

    // --- Damage ---

    pub fn damage(&mut self) {
        damage_effects::damage(self.world, self.ctx);
    }

    pub fn damage_with_fixed_recoil(&mut self, lost_hp: u32) {
        damage_effects::damage_with_fixed_recoil(self.world, self.ctx, lost_hp);
    }

    pub fn damage_with_recoil(&mut self, rate: f64) {
        damage_effects::damage_with_recoil(self.world, self.ctx, rate);
    }

    pub fn fixed_damage(&mut self, amount: u32) {
        damage_effects::fixed_damage(self.world, self.ctx, amount);
    }

    pub fn ensure_critical_hit(&mut self) {
        self.ctx.critical = true;
    }

    /// Scales the catch-all modifier of the next damage calculation.
    pub fn multiply_damage(&mut self, factor: f64) {
        self.ctx.damage_multiplier *= factor;
    }

    pub fn negate_move(&mut self) {
        self.ctx.negated = true;
    }

    // --- Stats ---

    pub fn lower_stat(&mut self, stat: Stat, levels: i32) {
        stat_effects::lower_stat(self.world, self.ctx.target, stat, levels);
    }

    pub fn raise_stat(&mut self, stat: Stat, levels: i32) {
        stat_effects::raise_stat(self.world, self.ctx.target, stat, levels);
    }

    pub fn standard_stat(&self, id: ParticipantId, stat: Stat) -> u32 {
        self.world.participant(id).stat(stat)
    }

    pub fn effective_stat(&self, id: ParticipantId, stat: Stat) -> f64 {
        self.world.effective_stat(id, stat, StageMode::All)
    }

    pub fn stat_stage(&self, id: ParticipantId, stat: Stat) -> i32 {
        self.world.volatile(id).map_or(0, |volatile| volatile.stage(stat))
    }

    // --- Narration ---

    pub fn show_text(&mut self, content: impl Into<String>) {
        self.world.show_text(content);
    }

    // --- Status conditions ---

    /// Inflicts `condition` on the target; false if it already had one.
    pub fn add_status_condition(&mut self, condition: StatusCondition) -> bool {
        status_effects::add_status_condition(self.world, self.ctx.target, condition)
    }

    pub fn remove_status_condition(&mut self) {
        status_effects::remove_status_condition(self.world, self.ctx.target);
    }

    /// Replaces the target's condition silently; no "already has one" check.
    pub fn change_status_condition(&mut self, condition: StatusCondition) {
        status_effects::replace_status_condition(self.world, self.ctx.target, condition);
    }

    pub fn sleep(&mut self, turns: u32) {
        status_effects::sleep(self.world, self.ctx.target, turns);
    }

    pub fn reduce_sleep_counter(&mut self) {
        status_effects::reduce_sleep_counter(self.world, self.ctx.target);
    }

    // --- Flags ---

    /// `duration` of -1 attaches the flag until removed.
    pub fn add_flag_user(&mut self, id: &str, duration: i32) {
        status_effects::add_flag(self.world, FlagBearer::Participant(self.ctx.user), id, duration);
    }

    pub fn add_flag_target(&mut self, id: &str, duration: i32) {
        status_effects::add_flag(self.world, FlagBearer::Participant(self.ctx.target), id, duration);
    }

    pub fn add_position_flag(&mut self, side: Side, id: &str, duration: i32) {
        status_effects::add_flag(self.world, FlagBearer::Position(side), id, duration);
    }

    pub fn remove_flag_user(&mut self, id: &str) -> bool {
        status_effects::remove_flag(self.world, FlagBearer::Participant(self.ctx.user), id)
    }

    pub fn remove_flag_target(&mut self, id: &str) -> bool {
        status_effects::remove_flag(self.world, FlagBearer::Participant(self.ctx.target), id)
    }

    pub fn has_flag(&self, id: ParticipantId, flag: &str) -> bool {
        status_effects::has_flag(self.world, FlagBearer::Participant(id), flag)
    }

    /// Side of a participant, for position flags.
    pub fn side_of(&self, id: ParticipantId) -> Side {
        self.world.side_of(id)
    }

    /// Payload of the flag whose hook is running; 0 outside flag hooks.
    pub fn flag_data(&self) -> i32 {
        self.current_flag().map_or(0, |flag| flag.data)
    }

    pub fn set_flag_data(&mut self, data: i32) {
        let Some(handle) = self.flag.clone() else {
            tracing::warn!("flag data written outside a flag hook");
            return;
        };
        let flag = match handle.bearer {
            FlagBearer::Participant(id) => self.world.volatile_mut(id).flag_mut(&handle.id),
            FlagBearer::Position(_) => self.world.battle.as_mut().and_then(|battle| {
                battle
                    .position_flags
                    .iter_mut()
                    .find(|flag| flag.id == handle.id && flag.bearer == handle.bearer)
            }),
        };
        if let Some(flag) = flag {
            flag.data = data;
        }
    }

    fn current_flag(&self) -> Option<&Flag> {
        let handle = self.flag.as_ref()?;
        match handle.bearer {
            FlagBearer::Participant(id) => self
                .world
                .volatile(id)?
                .flags
                .iter()
                .find(|flag| flag.id == handle.id),
            FlagBearer::Position(_) => self
                .world
                .battle
                .as_ref()?
                .position_flags
                .iter()
                .find(|flag| flag.id == handle.id && flag.bearer == handle.bearer),
        }
    }

    // --- Randomness ---

    /// Uniform integer in `min..=max` from the battle RNG.
    pub fn random(&mut self, min: i32, max: i32) -> i32 {
        self.world.rng.range(min, max, "hook")
    }

    // --- Multi-turn moves ---

    /// Keeps the current move receiving turn hooks for `turns` more turns.
    pub fn keep_move_active(&mut self, turns: u32) {
        let Some(move_data) = self.ctx.move_data.as_ref().map(Arc::clone) else {
            tracing::warn!("keep_move_active called outside a move");
            return;
        };
        let Some(battle) = self.world.battle.as_mut() else {
            return;
        };
        let bound = BoundMove {
            user: self.ctx.user,
            target: self.ctx.target,
            move_data,
            slot: self.ctx.slot.unwrap_or(MoveSlotRef::Fallback),
        };
        battle.active_moves.push(ActiveMove { bound, remaining: turns });
    }

    // --- Script variables ---

    pub fn variables(&self) -> &ScriptVariables {
        &self.world.variables
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.world.variables.get(name)
    }
}
