//! Core types and definitions for the Kingdom's Last Stand simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! enums, per-type tables, commands, state snapshots, events, the save
//! record, and tuning constants. It has no dependency on the ECS or any
//! runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod save;
pub mod state;
pub mod tables;
pub mod types;
