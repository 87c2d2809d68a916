//! Difficulty scaling: pure functions from (kind, tier, wave, power-up) to
//! concrete numbers. Nothing here holds state; the RNG is passed in.

use rand::Rng;

use kingdom_core::constants::*;
use kingdom_core::enums::{EnemyType, HealthCategory, PowerUp, TowerType};
use kingdom_core::tables::{enemy_spec, tower_spec};
use kingdom_core::types::ResourceBundle;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Damage each enemy attack deals to the health pool on `wave`.
pub fn attack_damage(wave: u32) -> f64 {
    let waves_past_first = wave.max(1) - 1;
    round2(BASE_ENEMY_DAMAGE * (1.0 + ENEMY_DAMAGE_GROWTH_PER_WAVE * waves_past_first as f64))
}

/// Speed factor for an enemy's difficulty tier. Tougher enemies walk slower.
pub fn speed_multiplier(difficulty_tier: u32) -> f64 {
    1.0 / (1.0 + ENEMY_TIER_SLOWDOWN * difficulty_tier as f64)
}

/// Walking speed (px/s) for an enemy on a path of `path_length`.
pub fn enemy_speed(path_length: f64, difficulty_tier: u32) -> f64 {
    let base = if path_length > 0.0 {
        path_length / ENEMY_BASE_TRAVEL_SECS
    } else {
        ENEMY_FALLBACK_SPEED
    };
    base * speed_multiplier(difficulty_tier)
}

pub fn health_category(difficulty_tier: u32) -> HealthCategory {
    match difficulty_tier {
        0 => HealthCategory::Light,
        1 => HealthCategory::Medium,
        2 => HealthCategory::Heavy,
        _ => HealthCategory::Colossal,
    }
}

/// Spawn health for an enemy, after the weakened-enemies modifier.
pub fn enemy_max_hp(kind: EnemyType, power_up: Option<PowerUp>) -> f64 {
    let base = enemy_spec(kind).max_hp;
    if power_up == Some(PowerUp::WeakenedEnemies) {
        (base * WEAKENED_HEALTH_FACTOR).floor()
    } else {
        base
    }
}

/// Loot scale: difficulty tier + 1, one more for bosses.
pub fn loot_multiplier(kind: EnemyType) -> f64 {
    let boss_bonus = if kind.is_boss() { 1.0 } else { 0.0 };
    enemy_spec(kind).difficulty_tier as f64 + 1.0 + boss_bonus
}

/// Reward for defeating `kind`: fixed gold plus independent resource drops.
pub fn roll_loot<R: Rng>(rng: &mut R, kind: EnemyType) -> ResourceBundle {
    let multiplier = loot_multiplier(kind);
    let mut loot = ResourceBundle::gold(enemy_spec(kind).reward_gold);
    if rng.gen_bool(SHARD_DROP_CHANCE) {
        loot.shards += SHARD_DROP_AMOUNT;
    }
    if rng.gen_bool(WOOD_DROP_CHANCE) {
        loot.wood += WOOD_DROP_BASE * multiplier;
    }
    if rng.gen_bool(STONE_DROP_CHANCE) {
        loot.stone += STONE_DROP_BASE * multiplier;
    }
    loot
}

pub fn tower_damage(kind: TowerType, tier: u8, power_up: Option<PowerUp>) -> f64 {
    let damage = tower_spec(kind).damage * tier.max(1) as f64;
    if power_up == Some(PowerUp::EnhancedDamage) {
        (damage * ENHANCED_DAMAGE_FACTOR).floor()
    } else {
        damage
    }
}

pub fn tower_range(kind: TowerType, tier: u8) -> f64 {
    tower_spec(kind).range + TOWER_RANGE_PER_TIER * (tier.max(1) - 1) as f64
}

/// Seconds between shots. Never below `TOWER_MIN_FIRE_INTERVAL_SECS`.
pub fn tower_fire_interval(kind: TowerType, tier: u8) -> f64 {
    let decay = TOWER_FIRE_RATE_DECAY.powi((tier.max(1) - 1) as i32);
    (tower_spec(kind).fire_interval_secs * decay).max(TOWER_MIN_FIRE_INTERVAL_SECS)
}

/// Price of reaching `tier`: the base cost times the tier, rounded, plus
/// the premium shard surcharge for the top tiers.
pub fn tier_cost(base: &ResourceBundle, tier: u8) -> ResourceBundle {
    let tier = tier.clamp(1, MAX_BUILDING_TIER);
    let mut cost = base.scaled(tier as f64).rounded();
    cost.shards += PREMIUM_SHARD_SURCHARGE[tier as usize - 1];
    cost
}

/// Apply the cheaper-towers discount to a gold cost, if active.
pub fn discounted(cost: ResourceBundle, power_up: Option<PowerUp>) -> ResourceBundle {
    if power_up == Some(PowerUp::CheaperTowers) {
        ResourceBundle {
            gold: (cost.gold * CHEAPER_TOWERS_GOLD_FACTOR).floor(),
            ..cost
        }
    } else {
        cost
    }
}

/// Gold for clearing `wave`.
pub fn wave_reward(wave: u32) -> f64 {
    WAVE_REWARD_BASE + WAVE_REWARD_PER_WAVE * wave as f64
}

/// Gold lost on failure, given the current balance.
pub fn failure_penalty(gold: f64) -> f64 {
    (gold.max(0.0) * FAILURE_GOLD_PENALTY).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_attack_damage_scales_per_wave() {
        assert_eq!(attack_damage(1), 10.0);
        assert_eq!(attack_damage(0), 10.0);
        assert_eq!(attack_damage(2), 10.1);
        assert_eq!(attack_damage(11), 11.0);
    }

    #[test]
    fn test_speed_multiplier_decreases_with_tier() {
        assert_eq!(speed_multiplier(0), 1.0);
        assert!((speed_multiplier(2) - 1.0 / 1.2).abs() < 1e-12);
        assert!(speed_multiplier(3) < speed_multiplier(2));
        assert_eq!(enemy_speed(900.0, 0), 30.0);
        assert_eq!(enemy_speed(0.0, 0), ENEMY_FALLBACK_SPEED);
    }

    #[test]
    fn test_health_categories() {
        assert_eq!(health_category(0), HealthCategory::Light);
        assert_eq!(health_category(2), HealthCategory::Heavy);
        assert_eq!(health_category(7), HealthCategory::Colossal);
    }

    #[test]
    fn test_weakened_enemies_halves_health() {
        assert_eq!(enemy_max_hp(EnemyType::Goblin, None), 60.0);
        assert_eq!(
            enemy_max_hp(EnemyType::Goblin, Some(PowerUp::WeakenedEnemies)),
            30.0
        );
        assert_eq!(
            enemy_max_hp(EnemyType::Orc, Some(PowerUp::EnhancedDamage)),
            130.0
        );
    }

    #[test]
    fn test_fire_interval_has_floor() {
        assert_eq!(tower_fire_interval(TowerType::Archer, 1), 1.0);
        assert!((tower_fire_interval(TowerType::Archer, 2) - 0.95).abs() < 1e-12);
        for tower in TowerType::ALL {
            for tier in 1..=20 {
                assert!(tower_fire_interval(tower, tier) >= TOWER_MIN_FIRE_INTERVAL_SECS);
            }
        }
        assert_eq!(tower_fire_interval(TowerType::Archer, 40), TOWER_MIN_FIRE_INTERVAL_SECS);
    }

    #[test]
    fn test_tower_damage_and_range() {
        assert_eq!(tower_damage(TowerType::Archer, 1, None), 24.0);
        assert_eq!(tower_damage(TowerType::Archer, 2, None), 48.0);
        assert_eq!(
            tower_damage(TowerType::Archer, 1, Some(PowerUp::EnhancedDamage)),
            31.0
        );
        assert_eq!(tower_range(TowerType::Archer, 3), 136.0);
    }

    #[test]
    fn test_tier_cost_with_surcharge() {
        let base = ResourceBundle::new(100.0, 50.0, 0.0, 0.0, 0.0);
        assert_eq!(tier_cost(&base, 2), ResourceBundle::new(200.0, 100.0, 0.0, 0.0, 0.0));
        assert_eq!(tier_cost(&base, 4).shards, 1.0);
        assert_eq!(tier_cost(&base, 5).shards, 2.0);
    }

    #[test]
    fn test_discount_only_touches_gold() {
        let cost = ResourceBundle::new(150.0, 40.0, 15.0, 0.0, 0.0);
        let cheap = discounted(cost, Some(PowerUp::CheaperTowers));
        assert_eq!(cheap, ResourceBundle::new(112.0, 40.0, 15.0, 0.0, 0.0));
        assert_eq!(discounted(cost, None), cost);
    }

    #[test]
    fn test_loot_all_drops() {
        // A zero stream makes every Bernoulli draw succeed.
        let mut rng = StepRng::new(0, 0);
        let loot = roll_loot(&mut rng, EnemyType::BossOrc);
        assert_eq!(loot.gold, 260.0);
        assert_eq!(loot.shards, 1.0);
        assert_eq!(loot.wood, 15.0 * 4.0);
        assert_eq!(loot.stone, 10.0 * 4.0);
    }

    #[test]
    fn test_loot_no_drops() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let loot = roll_loot(&mut rng, EnemyType::Goblin);
        assert_eq!(loot, ResourceBundle::gold(20.0));
    }

    #[test]
    fn test_wave_reward_and_penalty() {
        assert_eq!(wave_reward(1), 75.0);
        assert_eq!(wave_reward(4), 150.0);
        assert_eq!(failure_penalty(1234.0), 123.0);
        assert_eq!(failure_penalty(-5.0), 0.0);
    }
}
