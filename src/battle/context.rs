use crate::battle::state::{BoundMove, MoveSlotRef, ParticipantId};
use schema::MoveData;
use std::sync::Arc;

/// State shared by every step of one move's resolution.
///
/// Built fresh per move (or per flag hook outside a move) and passed by value
/// between queued steps, so nothing leaks into the next resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResolutionContext {
    pub user: ParticipantId,
    pub target: ParticipantId,
    pub move_data: Option<Arc<MoveData>>,
    pub slot: Option<MoveSlotRef>,
    pub critical: bool,
    pub negated: bool,
    /// Whether the last damaging effect connected.
    pub hit: bool,
    /// Damage dealt by the last damaging effect, read by recoil.
    pub damage_buffer: u32,
    pub damage_multiplier: f64,
}

impl MoveResolutionContext {
    pub fn for_move(bound: &BoundMove) -> Self {
        Self {
            user: bound.user,
            target: bound.target,
            move_data: Some(Arc::clone(&bound.move_data)),
            slot: Some(bound.slot),
            critical: false,
            negated: false,
            hit: false,
            damage_buffer: 0,
            damage_multiplier: 1.0,
        }
    }

    /// Context for a flag hook fired outside any move: the bearer is both
    /// user and target.
    pub fn for_flag(bearer: ParticipantId) -> Self {
        Self {
            user: bearer,
            target: bearer,
            move_data: None,
            slot: None,
            critical: false,
            negated: false,
            hit: false,
            damage_buffer: 0,
            damage_multiplier: 1.0,
        }
    }

    pub fn move_data(&self) -> Option<&MoveData> {
        self.move_data.as_deref()
    }

    pub fn move_id(&self) -> Option<&str> {
        self.move_data().map(|data| data.id.as_str())
    }
}
