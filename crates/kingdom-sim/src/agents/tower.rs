//! Tower state and target selection.

use glam::DVec2;

use kingdom_core::enums::{PowerUp, TowerType};
use kingdom_core::types::Tile;

use crate::difficulty;

#[derive(Debug, Clone)]
pub struct TowerAgent {
    pub id: u32,
    pub kind: TowerType,
    /// Defense-grid tile the tower stands on.
    pub tile: Tile,
    pub tier: u8,
    /// Seconds until the tower may fire again. Ready at or below zero.
    pub cooldown: f64,
}

/// An enemy the tower could shoot at.
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate {
    pub entity: hecs::Entity,
    pub enemy_id: u32,
    pub position: DVec2,
}

impl TowerAgent {
    pub fn new(id: u32, kind: TowerType, tile: Tile, tier: u8) -> Self {
        Self {
            id,
            kind,
            tile,
            tier,
            cooldown: 0.0,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.tile.defense_center()
    }

    pub fn range(&self) -> f64 {
        difficulty::tower_range(self.kind, self.tier)
    }

    pub fn fire_interval(&self) -> f64 {
        difficulty::tower_fire_interval(self.kind, self.tier)
    }

    pub fn damage(&self, power_up: Option<PowerUp>) -> f64 {
        difficulty::tower_damage(self.kind, self.tier, power_up)
    }

    /// Count the cooldown down. Returns true when the tower is ready.
    /// Time past zero is kept so the next interval starts on schedule.
    pub fn cool_down(&mut self, dt: f64) -> bool {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
        self.cooldown <= 0.0
    }

    pub fn reset_cooldown(&mut self) {
        self.cooldown += self.fire_interval();
    }

    /// Closest candidate strictly inside range. On equal distance the
    /// earlier candidate wins.
    pub fn choose_target(&self, candidates: &[TargetCandidate]) -> Option<TargetCandidate> {
        let origin = self.position();
        let range = self.range();
        let mut best: Option<(f64, TargetCandidate)> = None;
        for candidate in candidates {
            let distance = origin.distance(candidate.position);
            if distance >= range {
                continue;
            }
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, *candidate));
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(world: &mut hecs::World, enemy_id: u32, x: f64, y: f64) -> TargetCandidate {
        TargetCandidate {
            entity: world.spawn(()),
            enemy_id,
            position: DVec2::new(x, y),
        }
    }

    #[test]
    fn test_closest_in_range_wins() {
        let mut world = hecs::World::new();
        let tower = TowerAgent::new(1, TowerType::Archer, Tile::new(0, 0), 1);
        let origin = tower.position();
        let far = candidate(&mut world, 1, origin.x + 100.0, origin.y);
        let near = candidate(&mut world, 2, origin.x + 30.0, origin.y);
        let out = candidate(&mut world, 3, origin.x + 500.0, origin.y);
        let chosen = tower.choose_target(&[far, near, out]).unwrap();
        assert_eq!(chosen.enemy_id, 2);
    }

    #[test]
    fn test_tie_keeps_first_found() {
        let mut world = hecs::World::new();
        let tower = TowerAgent::new(1, TowerType::Archer, Tile::new(3, 3), 1);
        let origin = tower.position();
        let left = candidate(&mut world, 7, origin.x - 50.0, origin.y);
        let right = candidate(&mut world, 8, origin.x + 50.0, origin.y);
        assert_eq!(tower.choose_target(&[left, right]).unwrap().enemy_id, 7);
        assert_eq!(tower.choose_target(&[right, left]).unwrap().enemy_id, 8);
    }

    #[test]
    fn test_range_edge_is_excluded() {
        let mut world = hecs::World::new();
        let tower = TowerAgent::new(1, TowerType::Archer, Tile::new(0, 0), 1);
        let origin = tower.position();
        let edge = candidate(&mut world, 1, origin.x + tower.range(), origin.y);
        assert!(tower.choose_target(&[edge]).is_none());
    }

    #[test]
    fn test_cooldown_cycle() {
        let mut tower = TowerAgent::new(1, TowerType::Cannon, Tile::new(0, 0), 1);
        assert!(tower.cool_down(0.1));
        tower.reset_cooldown();
        assert_eq!(tower.cooldown, 2.0);
        assert!(!tower.cool_down(1.5));
        assert!(tower.cool_down(0.5));
        assert_eq!(tower.cooldown, 0.0);
    }

    #[test]
    fn test_cooldown_carries_overshoot() {
        let mut tower = TowerAgent::new(1, TowerType::Cannon, Tile::new(0, 0), 1);
        tower.reset_cooldown();
        assert!(!tower.cool_down(1.5));
        assert!(tower.cool_down(0.75));
        assert_eq!(tower.cooldown, -0.25);

        tower.reset_cooldown();
        assert_eq!(tower.cooldown, 1.75);
    }

    #[test]
    fn test_idle_tower_does_not_bank_time() {
        let mut tower = TowerAgent::new(1, TowerType::Cannon, Tile::new(0, 0), 1);
        for _ in 0..100 {
            assert!(tower.cool_down(0.5));
        }
        tower.reset_cooldown();
        assert_eq!(tower.cooldown, 2.0);
    }
}
