//! Simulation engine for Kingdom's Last Stand.
//!
//! Owns the hecs ECS world for the battlefield and the economy ledger for
//! the city, runs systems tick by tick, and produces GameStateSnapshots for
//! the frontend.

pub mod agents;
pub mod clock;
pub mod difficulty;
pub mod economy;
pub mod engine;
pub mod path;
pub mod systems;
pub mod wave;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use kingdom_core as core;
