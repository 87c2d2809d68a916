//! Homing projectiles.
//!
//! A projectile only remembers its target's entity handle. If the target is
//! despawned or dies before impact, the projectile fizzles.

use glam::DVec2;

use kingdom_core::constants::{PROJECTILE_HIT_THRESHOLD, PROJECTILE_LIFESPAN_SECS};

#[derive(Debug, Clone)]
pub struct ProjectileAgent {
    pub tower_id: u32,
    pub target: hecs::Entity,
    pub target_id: u32,
    /// Damage delivered on hit, fixed when fired.
    pub damage: f64,
    /// Travel speed (px/s).
    pub speed: f64,
    /// Seconds left before the projectile is discarded.
    pub lifespan: f64,
}

/// Result of moving a projectile for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    Flying(DVec2),
    Hit,
    Expired,
}

impl ProjectileAgent {
    pub fn new(tower_id: u32, target: hecs::Entity, target_id: u32, damage: f64, speed: f64) -> Self {
        Self {
            tower_id,
            target,
            target_id,
            damage,
            speed,
            lifespan: PROJECTILE_LIFESPAN_SECS,
        }
    }

    /// Home in on the target's current position.
    pub fn step(&mut self, position: DVec2, target_position: DVec2, dt: f64) -> ProjectileStep {
        self.lifespan -= dt;
        let travel = self.speed * dt;
        let distance = position.distance(target_position);
        if distance <= travel + PROJECTILE_HIT_THRESHOLD {
            return ProjectileStep::Hit;
        }
        if self.lifespan <= 0.0 {
            return ProjectileStep::Expired;
        }
        let direction = (target_position - position) / distance;
        ProjectileStep::Flying(position + direction * travel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile() -> ProjectileAgent {
        let mut world = hecs::World::new();
        ProjectileAgent::new(1, world.spawn(()), 9, 24.0, 100.0)
    }

    #[test]
    fn test_moves_toward_target() {
        let mut p = projectile();
        let step = p.step(DVec2::ZERO, DVec2::new(100.0, 0.0), 0.5);
        assert_eq!(step, ProjectileStep::Flying(DVec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_hits_within_threshold() {
        let mut p = projectile();
        let step = p.step(DVec2::ZERO, DVec2::new(14.0, 0.0), 0.1);
        assert_eq!(step, ProjectileStep::Hit);
    }

    #[test]
    fn test_expires_after_lifespan() {
        let mut p = projectile();
        p.speed = 1.0;
        let mut position = DVec2::ZERO;
        let mut steps = 0;
        loop {
            match p.step(position, DVec2::new(1000.0, 0.0), 0.5) {
                ProjectileStep::Flying(next) => position = next,
                ProjectileStep::Expired => break,
                ProjectileStep::Hit => panic!("should not reach target"),
            }
            steps += 1;
        }
        assert_eq!(steps, 3);
    }
}
