//! Persisted game record.
//!
//! The record holds only what cannot be rebuilt: placements are stored as
//! (kind, tile, tier) and everything derived from them (worker assignment,
//! capacities, investment) is recomputed on restore. Missing fields fall
//! back to the starting state.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{BuildingType, PowerUp, TowerType};
use crate::types::{ResourceBundle, Tile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSnapshot {
    /// Seed the battlefield path was generated from.
    pub seed: u64,
    pub resources: ResourceBundle,
    pub population: u32,
    /// Next wave to be fought.
    pub wave_number: u32,
    pub health: SavedHealth,
    pub buildings: Vec<SavedBuilding>,
    pub towers: Vec<SavedTower>,
    pub settings: Settings,
    pub consecutive_failures: u32,
    pub power_up_pending: bool,
    pub active_power_up: Option<PowerUp>,
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            resources: ResourceBundle::new(
                STARTING_GOLD,
                STARTING_WOOD,
                STARTING_STONE,
                STARTING_FOOD,
                STARTING_SHARDS,
            ),
            population: 0,
            wave_number: 1,
            health: SavedHealth::default(),
            buildings: Vec::new(),
            towers: Vec::new(),
            settings: Settings::default(),
            consecutive_failures: 0,
            power_up_pending: false,
            active_power_up: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedHealth {
    pub current: f64,
    pub max: f64,
}

impl Default for SavedHealth {
    fn default() -> Self {
        Self {
            current: BASE_MAX_HEALTH,
            max: BASE_MAX_HEALTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBuilding {
    pub building: BuildingType,
    pub tile: Tile,
    pub tier: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTower {
    pub tower: TowerType,
    pub tile: Tile,
    pub tier: u8,
}

/// Player preferences carried in the save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game_speed: u8,
    pub music_volume: f64,
    pub effects_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_speed: MIN_GAME_SPEED,
            music_volume: DEFAULT_MUSIC_VOLUME,
            effects_volume: DEFAULT_EFFECTS_VOLUME,
        }
    }
}
