//! A module for defining AI behaviors for battle opponents.

use crate::battle::rng::BattleRng;
use crate::battle::script_vars::ScriptVariables;

/// Move id of the bottomless fallback used when no slot has PP.
pub const FALLBACK_MOVE: &str = "Struggle";

/// What an AI decided to use this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChoice {
    Slot(usize),
    Fallback,
}

/// A trait for any system that can pick a move for a wild opponent.
///
/// It only sees the script variables, with `user` pointing at the
/// participant choosing.
pub trait MoveChooser {
    fn choose_move_wild_battle(&self, variables: &ScriptVariables, rng: &mut dyn BattleRng) -> MoveChoice;
}

/// Picks uniformly among the move slots that still have PP.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildBattleAi;

impl WildBattleAi {
    pub fn new() -> Self {
        Self
    }
}

impl MoveChooser for WildBattleAi {
    fn choose_move_wild_battle(&self, variables: &ScriptVariables, rng: &mut dyn BattleRng) -> MoveChoice {
        let move_count = variables.get_i64("user.moveCount").unwrap_or(0).max(0) as usize;
        let usable: Vec<usize> = (0..move_count)
            .filter(|slot| variables.get_i64(&format!("user.pp{}", slot)).unwrap_or(0) > 0)
            .collect();

        if usable.is_empty() {
            return MoveChoice::Fallback;
        }
        let pick = rng.range(0, usable.len() as i32 - 1, "wild AI move choice");
        MoveChoice::Slot(usable[pick as usize])
    }
}
