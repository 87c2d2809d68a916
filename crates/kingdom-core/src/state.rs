//! Game state snapshot: the complete visible state handed to the
//! rendering layer after each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{ResourceBundle, SimTime, Tile};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub game_speed: u8,
    pub resources: ResourceView,
    pub population: PopulationView,
    pub health: HealthView,
    pub wave: WaveView,
    pub support: SupportView,
    /// Battlefield path the enemies walk, start to end.
    pub path: Vec<DVec2>,
    pub buildings: Vec<BuildingView>,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Everything that happened since the previous snapshot, in order.
    pub events: Vec<SimEvent>,
}

/// Resource balances as the player sees them (whole units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub gold: u64,
    pub wood: u64,
    pub stone: u64,
    pub food: u64,
    pub shards: u64,
}

impl From<&ResourceBundle> for ResourceView {
    fn from(bundle: &ResourceBundle) -> Self {
        let whole = |v: f64| v.max(0.0).floor() as u64;
        Self {
            gold: whole(bundle.gold),
            wood: whole(bundle.wood),
            stone: whole(bundle.stone),
            food: whole(bundle.food),
            shards: whole(bundle.shards),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationView {
    pub count: u32,
    pub capacity: u32,
    pub unassigned: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthView {
    pub current: f64,
    pub max: f64,
}

/// Wave progress and power-up state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveView {
    /// The wave being fought, or the next one when idle.
    pub number: u32,
    pub status: WaveStatus,
    /// Enemies still waiting in the spawn queue.
    pub queued: u32,
    /// Enemies on the field.
    pub alive: u32,
    pub consecutive_failures: u32,
    pub power_up_pending: bool,
    pub active_power_up: Option<PowerUp>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportView {
    pub capacity: u32,
    pub used: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingView {
    pub id: u32,
    pub building: BuildingType,
    pub tile: Tile,
    pub tier: u8,
    pub assigned_workers: u32,
    pub required_workers: u32,
    /// 0.0 - 1.0.
    pub efficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: u32,
    pub tower: TowerType,
    pub tile: Tile,
    pub tier: u8,
    pub position: DVec2,
    pub range: f64,
    pub damage: f64,
    pub fire_interval_secs: f64,
    pub cooldown_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub enemy: EnemyType,
    pub phase: EnemyPhase,
    pub position: DVec2,
    /// Distance walked along the path (px).
    pub progress: f64,
    /// 0.0 - 1.0.
    pub health_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub tower_id: u32,
    pub position: DVec2,
}
