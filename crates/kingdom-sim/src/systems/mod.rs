//! ECS systems that operate on the battlefield each tick.
//!
//! Systems are functions over `&mut World` plus whatever ledger or RNG
//! they need, passed explicitly. They keep no state of their own.

pub mod cleanup;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod spawner;
pub mod targeting;

use kingdom_core::enums::PowerUp;

/// Per-tick inputs shared by every system.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Scaled seconds covered by this tick.
    pub dt: f64,
    /// Wave being fought.
    pub wave: u32,
    pub power_up: Option<PowerUp>,
}
