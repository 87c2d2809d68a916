//! Events emitted by the simulation, in order, for each tick.
//!
//! Consumers (UI, audio, logs) read them from the snapshot; the simulation
//! never calls back into presentation code.

use serde::{Deserialize, Serialize};

use crate::commands::RejectReason;
use crate::enums::*;
use crate::types::{ResourceBundle, Tile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    // --- Commands ---
    /// A queued command was refused.
    CommandRejected { reason: RejectReason },
    SpeedChanged { level: u8 },
    Paused,
    Resumed,

    // --- City ---
    BuildingPlaced {
        building_id: u32,
        building: BuildingType,
        tile: Tile,
    },
    BuildingUpgraded { building_id: u32, tier: u8 },
    BuildingDemolished {
        building_id: u32,
        refund: ResourceBundle,
    },
    ItemPurchased { key: String, granted: ResourceBundle },
    /// A production cycle completed.
    ProductionCycle {
        produced: ResourceBundle,
        consumed: ResourceBundle,
    },
    PopulationChanged { count: u32, capacity: u32 },
    HealthChanged { current: f64, max: f64 },

    // --- Defense ---
    TowerPlaced {
        tower_id: u32,
        tower: TowerType,
        tile: Tile,
    },
    TowerUpgraded { tower_id: u32, tier: u8 },
    TowerFired { tower_id: u32, enemy_id: u32 },
    ProjectileHit {
        tower_id: u32,
        enemy_id: u32,
        damage: f64,
    },
    /// Target vanished or lifespan ran out.
    ProjectileMissed { tower_id: u32, enemy_id: u32 },

    // --- Enemies ---
    EnemySpawned { enemy_id: u32, enemy: EnemyType },
    EnemyReachedEnd { enemy_id: u32 },
    BaseAttacked {
        enemy_id: u32,
        damage: f64,
        health_remaining: f64,
    },
    EnemyDefeated {
        enemy_id: u32,
        enemy: EnemyType,
        loot: ResourceBundle,
    },

    // --- Waves ---
    WaveStatusChanged { wave: u32, status: WaveStatus },
    WaveSucceeded { wave: u32, reward_gold: f64 },
    WaveFailed {
        wave: u32,
        penalty_gold: f64,
        consecutive_failures: u32,
    },
    /// Too many failures in a row; `StartWave` is blocked until a pick.
    PowerUpRequired { consecutive_failures: u32 },
    PowerUpActivated { power_up: PowerUp },
    PowerUpExpired { power_up: PowerUp },
}
