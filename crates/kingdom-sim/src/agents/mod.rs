//! ECS components for the three kinds of live entity on the battlefield.
//!
//! Each agent is plain data plus the small state transitions it owns.
//! Systems decide when to call them; agents never touch the world.

pub mod enemy;
pub mod projectile;
pub mod tower;

use glam::DVec2;

pub use enemy::EnemyAgent;
pub use projectile::{ProjectileAgent, ProjectileStep};
pub use tower::TowerAgent;

/// Field-space position of an entity (px).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub DVec2);
