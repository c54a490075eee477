pub mod ai;
pub mod builtin_hooks;
pub mod commands;
pub mod context;
pub mod controller;
pub mod hooks;
pub mod input;
pub mod interactive;
pub mod move_effects;
pub mod narration;
pub mod native;
pub mod rng;
pub mod script_vars;
pub mod state;
pub mod stats;
pub mod task;
pub mod turn_orchestrator;
pub mod world;

#[cfg(test)]
mod tests;
