//! Hook registry and the dispatch order used to fire lifecycle hooks.

use crate::battle::context::MoveResolutionContext;
use crate::battle::move_effects::status_effects;
use crate::battle::native::{FlagHandle, NativeApi};
use crate::battle::state::{FlagBearer, ParticipantId, Side};
use crate::battle::world::BattleWorld;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Move,
    Flag,
}

/// Lifecycle points at which hooks fire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeMove,
    OnUse,
    OnTurnStart,
    OnTurnEnd,
    BeforeDamageInflict,
    /// A participant entering the field mid-battle.
    OnSwitchIn,
    OnBattleEnd,
    /// Any other hook a flag chooses to define.
    Custom(String),
}

impl HookKind {
    pub fn name(&self) -> &str {
        match self {
            HookKind::BeforeMove => "beforeMove",
            HookKind::OnUse => "onUse",
            HookKind::OnTurnStart => "onTurnStart",
            HookKind::OnTurnEnd => "onTurnEnd",
            HookKind::BeforeDamageInflict => "beforeDamageInflict",
            HookKind::OnSwitchIn => "onSwitchIn",
            HookKind::OnBattleEnd => "onBattleEnd",
            HookKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name under which an external logic runtime would expose the hook:
/// `<moveId>_<hook>` or `Flag_<flagId>_<hook>`.
pub fn function_name(kind: EntityKind, entity: &str, hook: &HookKind) -> String {
    match kind {
        EntityKind::Move => format!("{}_{}", entity, hook.name()),
        EntityKind::Flag => format!("Flag_{}_{}", entity, hook.name()),
    }
}

/// Behavior bound to a (entity, hook) pair.
pub trait Hook: Send + Sync {
    fn call(&self, api: &mut NativeApi<'_>);
}

impl<F> Hook for F
where
    F: Fn(&mut NativeApi<'_>) + Send + Sync,
{
    fn call(&self, api: &mut NativeApi<'_>) {
        self(api)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HookKey {
    kind: EntityKind,
    entity: String,
    hook: HookKind,
}

/// Maps `(EntityKind, entity id, HookKind)` to behavior.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<HookKey, Arc<dyn Hook>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .hooks
            .keys()
            .map(|key| function_name(key.kind, &key.entity, &key.hook))
            .collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: EntityKind, entity: &str, hook: HookKind, behavior: F)
    where
        F: Fn(&mut NativeApi<'_>) + Send + Sync + 'static,
    {
        let key = HookKey {
            kind,
            entity: entity.to_string(),
            hook,
        };
        self.hooks.insert(key, Arc::new(behavior));
    }

    pub fn register_move_hook<F>(&mut self, move_id: &str, hook: HookKind, behavior: F)
    where
        F: Fn(&mut NativeApi<'_>) + Send + Sync + 'static,
    {
        self.register(EntityKind::Move, move_id, hook, behavior);
    }

    pub fn register_flag_hook<F>(&mut self, flag_id: &str, hook: HookKind, behavior: F)
    where
        F: Fn(&mut NativeApi<'_>) + Send + Sync + 'static,
    {
        self.register(EntityKind::Flag, flag_id, hook, behavior);
    }

    pub fn get(&self, kind: EntityKind, entity: &str, hook: &HookKind) -> Option<Arc<dyn Hook>> {
        let key = HookKey {
            kind,
            entity: entity.to_string(),
            hook: hook.clone(),
        };
        self.hooks.get(&key).cloned()
    }

    pub fn contains(&self, kind: EntityKind, entity: &str, hook: &HookKind) -> bool {
        self.get(kind, entity, hook).is_some()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// A flag hook to fire, captured before any hook runs.
#[derive(Debug, Clone)]
struct FlagTrigger {
    id: String,
    bearer: FlagBearer,
    subject: ParticipantId,
}

impl BattleWorld {
    /// Fires the move-bound hook for the context's move, if any.
    pub(crate) fn trigger_move_hook(&mut self, ctx: &mut MoveResolutionContext, hook: &HookKind) {
        let Some(move_id) = ctx.move_id().map(str::to_string) else {
            return;
        };
        let Some(behavior) = self.hooks.get(EntityKind::Move, &move_id, hook) else {
            return;
        };
        tracing::debug!(function = %function_name(EntityKind::Move, &move_id, hook), "dispatching hook");
        self.prepare_script_variables(ctx);
        behavior.call(&mut NativeApi::new(self, ctx, None));
    }

    fn fire_flag_hook(&mut self, trigger: &FlagTrigger, ctx: &mut MoveResolutionContext, hook: &HookKind) {
        if !self.flag_attached(&trigger.bearer, &trigger.id) {
            return;
        }
        let Some(behavior) = self.hooks.get(EntityKind::Flag, &trigger.id, hook) else {
            return;
        };
        tracing::debug!(
            function = %function_name(EntityKind::Flag, &trigger.id, hook),
            subject = %trigger.subject,
            "dispatching hook"
        );

        let original_target = ctx.target;
        ctx.target = trigger.subject;
        self.prepare_script_variables(ctx);
        let handle = FlagHandle {
            id: trigger.id.clone(),
            bearer: trigger.bearer,
        };
        behavior.call(&mut NativeApi::new(self, ctx, Some(handle)));
        ctx.target = original_target;
    }

    /// Fires `hook` for the context's move and then for every flag on the
    /// move's user. Flag hooks see the flag bearer as their target.
    pub(crate) fn trigger_user_events(&mut self, ctx: &mut MoveResolutionContext, hook: &HookKind) {
        self.trigger_move_hook(ctx, hook);

        let user = ctx.user;
        let triggers: Vec<FlagTrigger> = self
            .volatile
            .get(&user)
            .map(|volatile| {
                volatile
                    .flags
                    .iter()
                    .map(|flag| FlagTrigger {
                        id: flag.id.clone(),
                        bearer: flag.bearer,
                        subject: user,
                    })
                    .collect()
            })
            .unwrap_or_default();

        for trigger in &triggers {
            self.fire_flag_hook(trigger, ctx, hook);
        }
    }

    /// Fires a turn-level hook: active multi-turn moves, then moves used this
    /// turn, then position flags (player side first), then the flags of each
    /// side's active participant. Every applicable hook fires.
    pub(crate) fn trigger_event(&mut self, hook: &HookKind) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        let mut moves: Vec<_> = battle.active_moves.iter().map(|active| active.bound.clone()).collect();
        moves.extend(battle.used_moves.iter().cloned());

        let mut triggers = Vec::new();
        for side in Side::BOTH {
            let Some(subject) = self.active(side) else {
                continue;
            };
            triggers.extend(battle.flags_at(side).map(|flag| FlagTrigger {
                id: flag.id.clone(),
                bearer: flag.bearer,
                subject,
            }));
        }
        let fielded: Vec<ParticipantId> = Side::BOTH.into_iter().filter_map(|side| self.active(side)).collect();
        triggers.extend(self.participant_flag_triggers(&fielded));

        for bound in &moves {
            let mut ctx = MoveResolutionContext::for_move(bound);
            self.trigger_move_hook(&mut ctx, hook);
        }
        self.fire_flag_triggers(&triggers, hook);
    }

    /// Fires `hook` for the flags of `participants` only, in the given order.
    pub(crate) fn trigger_participant_event(&mut self, participants: &[ParticipantId], hook: &HookKind) {
        let triggers = self.participant_flag_triggers(participants);
        self.fire_flag_triggers(&triggers, hook);
    }

    fn participant_flag_triggers(&self, participants: &[ParticipantId]) -> Vec<FlagTrigger> {
        participants
            .iter()
            .filter_map(|&id| self.volatile.get(&id).map(|volatile| (id, volatile)))
            .flat_map(|(id, volatile)| {
                volatile.flags.iter().map(move |flag| FlagTrigger {
                    id: flag.id.clone(),
                    bearer: flag.bearer,
                    subject: id,
                })
            })
            .collect()
    }

    fn fire_flag_triggers(&mut self, triggers: &[FlagTrigger], hook: &HookKind) {
        for trigger in triggers {
            let mut ctx = MoveResolutionContext::for_flag(trigger.subject);
            self.fire_flag_hook(trigger, &mut ctx, hook);
        }
    }

    fn flag_attached(&self, bearer: &FlagBearer, id: &str) -> bool {
        status_effects::has_flag(self, *bearer, id)
    }
}
