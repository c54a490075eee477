use schema::{MoveData, Stat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Inclusive bound of every stat stage counter.
pub const MAX_STAGE: i32 = 6;

/// Lifecycle of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    PendingStart,
    Ready,
    Victory,
    Defeat,
    Draw,
}

impl BattleState {
    pub fn is_finished(self) -> bool {
        matches!(self, BattleState::Victory | BattleState::Defeat | BattleState::Draw)
    }
}

/// Opaque handle of a participant in the battle arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(usize);

impl ParticipantId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two opposing sides. The player's side owns the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Prefix of this side's roster variables (`playerTeam[0].hp`).
    pub fn team_variable(self) -> &'static str {
        match self {
            Side::Player => "playerTeam",
            Side::Opponent => "opponentTeam",
        }
    }
}

/// What a flag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagBearer {
    Position(Side),
    Participant(ParticipantId),
}

/// A named status effect whose behavior lives in hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub bearer: FlagBearer,
    /// Turns left; `None` lasts until removed.
    pub remaining: Option<u32>,
    /// Auxiliary payload owned by the flag's hooks (e.g. a toxic counter).
    pub data: i32,
}

impl Flag {
    /// `duration` of -1 (or any negative value) makes the flag permanent.
    pub fn new(id: &str, bearer: FlagBearer, duration: i32) -> Self {
        Self {
            id: id.to_string(),
            bearer,
            remaining: u32::try_from(duration).ok(),
            data: 0,
        }
    }
}

/// Battle-scoped per-participant modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatileData {
    stat_stages: [i32; 8],
    pub critical_hit_stage: u32,
    pub flags: Vec<Flag>,
}

impl VolatileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, stat: Stat) -> i32 {
        self.stat_stages[stat.index()]
    }

    /// Applies `delta` clamped to the stage bounds; returns the change applied.
    pub fn change_stage(&mut self, stat: Stat, delta: i32) -> i32 {
        let before = self.stage(stat);
        let after = (before + delta).clamp(-MAX_STAGE, MAX_STAGE);
        self.stat_stages[stat.index()] = after;
        after - before
    }

    pub fn set_stage(&mut self, stat: Stat, stage: i32) {
        self.stat_stages[stat.index()] = stage.clamp(-MAX_STAGE, MAX_STAGE);
    }

    pub fn has_flag(&self, id: &str) -> bool {
        self.flags.iter().any(|flag| flag.id == id)
    }

    pub fn flag_names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|flag| flag.id.as_str())
    }

    pub fn flag_mut(&mut self, id: &str) -> Option<&mut Flag> {
        self.flags.iter_mut().find(|flag| flag.id == id)
    }
}

/// Which of the user's move slots a committed move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSlotRef {
    Slot(usize),
    /// The bottomless-PP fallback move; never costs PP.
    Fallback,
}

/// One committed action for the turn.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundMove {
    pub user: ParticipantId,
    pub target: ParticipantId,
    pub move_data: Arc<MoveData>,
    pub slot: MoveSlotRef,
}

impl BoundMove {
    pub fn move_id(&self) -> &str {
        &self.move_data.id
    }
}

/// A move that keeps receiving turn hooks for a number of turns after use.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMove {
    pub bound: BoundMove,
    pub remaining: u32,
}

/// The live match record, created at battle start and dropped at its end.
#[derive(Debug, Clone, Default)]
pub struct Battle {
    pub position_flags: Vec<Flag>,
    pub used_moves: Vec<BoundMove>,
    pub active_moves: Vec<ActiveMove>,
    pub turn_number: u32,
}

impl Battle {
    pub fn new() -> Self {
        Self {
            turn_number: 1,
            ..Self::default()
        }
    }

    /// Position flags of `side`, in attachment order.
    pub fn flags_at(&self, side: Side) -> impl Iterator<Item = &Flag> {
        self.position_flags
            .iter()
            .filter(move |flag| flag.bearer == FlagBearer::Position(side))
    }
}
