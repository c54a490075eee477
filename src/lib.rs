// In: src/lib.rs

//! Pokemon Battle Simulator
//!
//! A turn-based battle resolver: given two rosters, their chosen moves and a
//! library of move and species data, it resolves each turn (ordering,
//! hit/miss, damage, stat stages, status conditions, fainting) and narrates
//! it through cooperative event queues a front end drains one frame at a
//! time.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod event_queue;
pub mod pokemon;
pub mod resources;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, LearnsetEntry, MoveCategory, MoveData, MoveFunction, MoveTarget, Nature, PokemonType,
    SpeciesData, Stat, StatusCondition,
};

// --- From this crate's modules (`src/`) ---

// Battle lifecycle and front end.
pub use battle::controller::BattleController;
pub use battle::interactive::{EncounterState, InteractiveLayer};
pub use battle::state::{BattleState, BoundMove, ParticipantId, Side};

// Extension points.
pub use battle::ai::{MoveChoice, MoveChooser, WildBattleAi};
pub use battle::hooks::{EntityKind, HookKind, HookRegistry};
pub use battle::native::NativeApi;
pub use battle::rng::{BattleRng, SeededRng, TurnRng};

// Participants and data.
pub use pokemon::{generate_pokemon, PokemonBuilder, PokemonInst};
pub use resources::ResourceStore;

// Configuration, errors and result types.
pub use config::{BattleConfig, DoubleFaintRule};
pub use errors::{BattleEngineError, BattleResult, ConfigError, DataLoadError, ResourceError};
