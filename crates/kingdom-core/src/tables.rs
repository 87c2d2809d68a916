//! Per-type stat tables for buildings, towers, enemies, and shop items.
//!
//! Every behavior difference between kinds is data in these tables; the
//! simulation never branches on a kind except to look it up here.

use crate::constants::MAX_BUILDING_TIER;
use crate::enums::{BuildingType, EnemyType, TowerType};
use crate::types::ResourceBundle;

/// Static description of a building kind.
#[derive(Debug, Clone, Copy)]
pub struct BuildingSpec {
    /// Cost of the first tier; tier t costs `base_cost × t`.
    pub base_cost: ResourceBundle,
    /// Output per production cycle at tier 1 with full staff.
    pub production: ResourceBundle,
    /// Consumption per production cycle at tier 1 with full staff.
    pub upkeep: ResourceBundle,
    /// Citizens needed for full efficiency. Zero means always efficient.
    pub workers_required: u32,
    /// Citizens the city must have before this kind can be placed.
    pub min_population: u32,
    /// Tower slots per tier (barracks only).
    pub support_per_tier: f64,
    /// Whether this kind feeds the health pool bonus.
    pub heals: bool,
}

/// Population capacity of a house, indexed by `tier - 1`.
pub const HOUSE_CAPACITY_BY_TIER: [u32; MAX_BUILDING_TIER as usize] = [5, 10, 16, 23, 31];

/// Get the stat table for a building kind.
pub fn building_spec(kind: BuildingType) -> BuildingSpec {
    use crate::constants::SUPPORT_PER_BARRACKS_TIER;

    let idle = BuildingSpec {
        base_cost: ResourceBundle::ZERO,
        production: ResourceBundle::ZERO,
        upkeep: ResourceBundle::ZERO,
        workers_required: 0,
        min_population: 0,
        support_per_tier: 0.0,
        heals: false,
    };

    match kind {
        BuildingType::House => BuildingSpec {
            base_cost: ResourceBundle::new(100.0, 50.0, 0.0, 0.0, 0.0),
            production: ResourceBundle::gold(5.0),
            ..idle
        },
        BuildingType::Farm => BuildingSpec {
            base_cost: ResourceBundle::new(120.0, 60.0, 0.0, 0.0, 0.0),
            production: ResourceBundle::new(0.0, 0.0, 0.0, 6.0, 0.0),
            workers_required: 2,
            ..idle
        },
        BuildingType::LumberMill => BuildingSpec {
            base_cost: ResourceBundle::new(200.0, 100.0, 0.0, 0.0, 0.0),
            production: ResourceBundle::new(0.0, 10.0, 0.0, 0.0, 0.0),
            workers_required: 3,
            ..idle
        },
        BuildingType::Quarry => BuildingSpec {
            base_cost: ResourceBundle::new(300.0, 0.0, 50.0, 0.0, 0.0),
            production: ResourceBundle::new(0.0, 0.0, 8.0, 0.0, 0.0),
            workers_required: 3,
            ..idle
        },
        BuildingType::Barracks => BuildingSpec {
            base_cost: ResourceBundle::new(500.0, 200.0, 0.0, 0.0, 0.0),
            upkeep: ResourceBundle::new(0.0, 0.0, 0.0, 2.0, 0.0),
            workers_required: 4,
            min_population: 5,
            support_per_tier: SUPPORT_PER_BARRACKS_TIER,
            ..idle
        },
        BuildingType::Hospital => BuildingSpec {
            base_cost: ResourceBundle::new(450.0, 150.0, 150.0, 0.0, 0.0),
            upkeep: ResourceBundle::new(3.0, 1.0, 1.0, 0.0, 0.0),
            workers_required: 3,
            min_population: 8,
            heals: true,
            ..idle
        },
    }
}

/// Population a house of the given tier shelters.
pub fn house_capacity(tier: u8) -> u32 {
    let index = tier.clamp(1, MAX_BUILDING_TIER) as usize - 1;
    HOUSE_CAPACITY_BY_TIER[index]
}

/// Static description of a tower kind.
#[derive(Debug, Clone, Copy)]
pub struct TowerSpec {
    pub base_cost: ResourceBundle,
    /// Damage per projectile at tier 1.
    pub damage: f64,
    /// Targeting range at tier 1 (px).
    pub range: f64,
    /// Seconds between shots at tier 1.
    pub fire_interval_secs: f64,
    /// Projectile speed (px/s).
    pub projectile_speed: f64,
    pub max_tier: u8,
}

pub fn tower_spec(kind: TowerType) -> TowerSpec {
    match kind {
        TowerType::Archer => TowerSpec {
            base_cost: ResourceBundle::new(150.0, 40.0, 15.0, 0.0, 0.0),
            damage: 24.0,
            range: 120.0,
            fire_interval_secs: 1.0,
            projectile_speed: 360.0,
            max_tier: 5,
        },
        TowerType::Cannon => TowerSpec {
            base_cost: ResourceBundle::new(300.0, 20.0, 90.0, 0.0, 0.0),
            damage: 50.0,
            range: 140.0,
            fire_interval_secs: 2.0,
            projectile_speed: 280.0,
            max_tier: 5,
        },
        TowerType::Magic => TowerSpec {
            base_cost: ResourceBundle::new(250.0, 35.0, 60.0, 0.0, 0.0),
            damage: 40.0,
            range: 100.0,
            fire_interval_secs: 1.5,
            projectile_speed: 420.0,
            max_tier: 4,
        },
    }
}

/// Static description of an enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemySpec {
    pub max_hp: f64,
    /// Drives speed, health category, and loot size.
    pub difficulty_tier: u32,
    /// Gold credited on defeat.
    pub reward_gold: f64,
}

pub fn enemy_spec(kind: EnemyType) -> EnemySpec {
    let (max_hp, difficulty_tier, reward_gold) = match kind {
        EnemyType::Goblin => (60.0, 0, 20.0),
        EnemyType::Orc => (130.0, 1, 45.0),
        EnemyType::Dragon => (260.0, 2, 90.0),
        EnemyType::BossGoblin => (300.0, 1, 140.0),
        EnemyType::BossOrc => (500.0, 2, 260.0),
        EnemyType::BossDragon => (1000.0, 3, 600.0),
    };
    EnemySpec {
        max_hp,
        difficulty_tier,
        reward_gold,
    }
}

/// A purchasable bundle in the shop.
#[derive(Debug, Clone, Copy)]
pub struct ShopItem {
    pub key: &'static str,
    pub price: ResourceBundle,
    pub grants: ResourceBundle,
}

pub const SHOP_ITEMS: [ShopItem; 6] = [
    ShopItem {
        key: "shard-1",
        price: ResourceBundle::gold(500.0),
        grants: ResourceBundle::new(0.0, 0.0, 0.0, 0.0, 1.0),
    },
    ShopItem {
        key: "shard-5",
        price: ResourceBundle::gold(2000.0),
        grants: ResourceBundle::new(0.0, 0.0, 0.0, 0.0, 5.0),
    },
    ShopItem {
        key: "shard-10",
        price: ResourceBundle::gold(3500.0),
        grants: ResourceBundle::new(0.0, 0.0, 0.0, 0.0, 10.0),
    },
    ShopItem {
        key: "wood-bundle",
        price: ResourceBundle::gold(200.0),
        grants: ResourceBundle::new(0.0, 100.0, 0.0, 0.0, 0.0),
    },
    ShopItem {
        key: "stone-bundle",
        price: ResourceBundle::gold(250.0),
        grants: ResourceBundle::new(0.0, 0.0, 80.0, 0.0, 0.0),
    },
    ShopItem {
        key: "food-crate",
        price: ResourceBundle::gold(150.0),
        grants: ResourceBundle::new(0.0, 0.0, 0.0, 100.0, 0.0),
    },
];

/// Look up a shop item by key.
pub fn shop_item(key: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.key == key)
}
