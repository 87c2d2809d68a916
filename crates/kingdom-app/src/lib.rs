//! Kingdom's Last Stand application layer.
//!
//! Runs the simulation engine on its own thread, forwards player commands
//! to it, publishes snapshots, and persists the game between sessions.

pub mod autopilot;
pub mod game_loop;
pub mod persistence;
pub mod state;

pub use kingdom_core as core;
