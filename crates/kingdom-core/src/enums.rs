//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// City building kinds. Behavior per kind lives in `tables::building_spec`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    #[default]
    House,
    Farm,
    LumberMill,
    Quarry,
    Barracks,
    Hospital,
}

impl BuildingType {
    pub const ALL: [BuildingType; 6] = [
        BuildingType::House,
        BuildingType::Farm,
        BuildingType::LumberMill,
        BuildingType::Quarry,
        BuildingType::Barracks,
        BuildingType::Hospital,
    ];

    /// Order in which idle citizens are assigned to workplaces.
    pub const STAFFING_PRIORITY: [BuildingType; 5] = [
        BuildingType::Farm,
        BuildingType::LumberMill,
        BuildingType::Quarry,
        BuildingType::Barracks,
        BuildingType::Hospital,
    ];
}

/// Defensive tower kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerType {
    #[default]
    Archer,
    Cannon,
    Magic,
}

impl TowerType {
    pub const ALL: [TowerType; 3] = [TowerType::Archer, TowerType::Cannon, TowerType::Magic];
}

/// Enemy kinds, including the boss variant of each base kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Goblin,
    Orc,
    Dragon,
    BossGoblin,
    BossOrc,
    BossDragon,
}

impl EnemyType {
    pub const BOSSES: [EnemyType; 3] = [
        EnemyType::BossGoblin,
        EnemyType::BossOrc,
        EnemyType::BossDragon,
    ];

    pub fn is_boss(&self) -> bool {
        Self::BOSSES.contains(self)
    }

    /// The regular kind a boss is an elite variant of.
    pub fn base_kind(&self) -> EnemyType {
        match self {
            EnemyType::BossGoblin => EnemyType::Goblin,
            EnemyType::BossOrc => EnemyType::Orc,
            EnemyType::BossDragon => EnemyType::Dragon,
            other => *other,
        }
    }
}

/// Lifecycle of an enemy once it has left the spawn queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Walking the path.
    #[default]
    Moving,
    /// Parked at the path end, hitting the base on a cooldown.
    Attacking,
    /// Dead or otherwise finished; waiting for cleanup.
    Removed,
}

/// Coarse health bracket derived from an enemy's difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthCategory {
    #[default]
    Light,
    Medium,
    Heavy,
    Colossal,
}

/// Wave lifecycle status. Only ever moves forward within a wave:
/// Idle → Spawning → Resolving → Success | Failure → Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveStatus {
    #[default]
    Idle,
    Spawning,
    Resolving,
    Success,
    Failure,
}

/// One-wave modifiers offered after repeated failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUp {
    /// Enemy health halved.
    WeakenedEnemies,
    /// Tower and building gold costs reduced by a quarter.
    CheaperTowers,
    /// Tower damage boosted by 30%.
    EnhancedDamage,
}
