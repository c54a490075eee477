// Battle simulator schema - shared data definitions.
// This crate holds the static reference data types (types, moves, species,
// stats) that the engine loads from RON and shares by reference.

// Re-export the main types
pub use move_types::*;
pub use pokemon_types::*;
pub use species::*;
pub use stats::*;

pub mod move_types;
pub mod pokemon_types;
pub mod species;
pub mod stats;
