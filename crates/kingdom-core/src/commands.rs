//! Player commands sent from the command layer to the simulation.
//!
//! Commands can be applied immediately (`SimulationEngine::apply`) or queued
//! for the next tick boundary. Either way every command ends in a
//! `CommandResult`: an acknowledgement or a `RejectReason` code.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ResourceBundle, Tile};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- City ---
    /// Construct a tier-1 building on an empty city tile.
    PlaceBuilding { building: BuildingType, tile: Tile },
    /// Raise the building on a city tile by one tier.
    UpgradeBuilding { tile: Tile },
    /// Tear down a building and refund half of what it cost.
    DemolishBuilding { tile: Tile },
    /// Buy a shop bundle by key (e.g. "shard-5").
    PurchaseShopItem { key: String },

    // --- Defense ---
    /// Build a tier-1 tower on a free defense tile.
    PlaceTower { tower: TowerType, tile: Tile },
    /// Raise the tower on a defense tile by one tier.
    UpgradeTower { tile: Tile },

    // --- Waves ---
    /// Begin the next wave.
    StartWave,
    /// Forfeit the running wave.
    AbandonWave,
    /// Choose the modifier offered after repeated failures.
    SelectPowerUp { power_up: PowerUp },

    // --- Simulation control ---
    /// Set the speed multiplier (1..=5).
    SetGameSpeed { level: u8 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}

/// Successful outcome of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandAck {
    BuildingPlaced { building_id: u32 },
    BuildingUpgraded { building_id: u32, tier: u8 },
    BuildingDemolished { building_id: u32, refund: ResourceBundle },
    ItemPurchased { granted: ResourceBundle },
    TowerPlaced { tower_id: u32 },
    TowerUpgraded { tower_id: u32, tier: u8 },
    WaveStarted { wave: u32, enemies: u32 },
    WaveAbandoned { wave: u32 },
    PowerUpSelected { power_up: PowerUp },
    SpeedSet { level: u8 },
    Paused,
    Resumed,
}

/// Why a command was refused. Rejections never change simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum RejectReason {
    #[error("tile is outside the grid or blocked by the path")]
    InvalidPlacement,
    #[error("tile is already occupied")]
    TileOccupied,
    #[error("no building on that tile")]
    NoBuilding,
    #[error("no tower on that tile")]
    NoTower,
    #[error("not enough resources")]
    InsufficientResources,
    #[error("not enough support capacity for another tower")]
    InsufficientSupport,
    #[error("population too small for this building")]
    InsufficientPopulation,
    #[error("unknown shop item")]
    UnknownItem,
    #[error("already at maximum tier")]
    MaxTier,
    #[error("a wave is already in progress")]
    WaveInProgress,
    #[error("no wave is in progress")]
    NoActiveWave,
    #[error("a power-up must be selected first")]
    PowerUpRequired,
    #[error("no power-up selection is pending")]
    NoPowerUpPending,
    #[error("game speed must be between 1 and 5")]
    InvalidSpeed,
}

/// Outcome of applying one command.
pub type CommandResult = Result<CommandAck, RejectReason>;
