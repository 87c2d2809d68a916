//! Projectile system: homing flight, hit resolution, and kill rewards.

use std::collections::HashMap;

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use kingdom_core::events::SimEvent;

use crate::agents::{EnemyAgent, Position, ProjectileAgent, ProjectileStep};
use crate::difficulty;
use crate::economy::EconomyLedger;
use crate::systems::TickContext;

/// Move every projectile, apply hits, credit loot for kills, and despawn
/// projectiles that hit, expired, or lost their target.
pub fn run(
    world: &mut World,
    ledger: &mut EconomyLedger,
    rng: &mut ChaCha8Rng,
    ctx: &TickContext,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let targets: HashMap<Entity, DVec2> = world
        .query::<(&Position, &EnemyAgent)>()
        .iter()
        .filter(|(_, (_, enemy))| enemy.is_alive())
        .map(|(entity, (pos, _))| (entity, pos.0))
        .collect();

    let mut hits = Vec::new();
    for (entity, (pos, projectile)) in world.query_mut::<(&mut Position, &mut ProjectileAgent)>() {
        let step = match targets.get(&projectile.target) {
            Some(target) => projectile.step(pos.0, *target, ctx.dt),
            None => ProjectileStep::Expired,
        };
        match step {
            ProjectileStep::Flying(next) => pos.0 = next,
            ProjectileStep::Hit => {
                hits.push((
                    projectile.target,
                    projectile.target_id,
                    projectile.tower_id,
                    projectile.damage,
                ));
                despawn_buffer.push(entity);
            }
            ProjectileStep::Expired => {
                events.push(SimEvent::ProjectileMissed {
                    tower_id: projectile.tower_id,
                    enemy_id: projectile.target_id,
                });
                despawn_buffer.push(entity);
            }
        }
    }

    for (target, target_id, tower_id, damage) in hits {
        // Another projectile may have finished the target earlier this tick.
        let outcome = match world.get::<&mut EnemyAgent>(target) {
            Ok(mut enemy) if enemy.is_alive() => {
                let killed = enemy.take_damage(damage);
                Some((enemy.id, enemy.kind, killed))
            }
            _ => None,
        };
        let Some((enemy_id, kind, killed)) = outcome else {
            events.push(SimEvent::ProjectileMissed {
                tower_id,
                enemy_id: target_id,
            });
            continue;
        };

        events.push(SimEvent::ProjectileHit {
            tower_id,
            enemy_id,
            damage,
        });
        if killed {
            let loot = difficulty::roll_loot(rng, kind);
            ledger.credit(&loot);
            events.push(SimEvent::EnemyDefeated {
                enemy_id,
                enemy: kind,
                loot,
            });
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingdom_core::enums::{EnemyPhase, EnemyType};
    use rand::SeedableRng;

    use crate::path::PathModel;
    use crate::world_setup;

    fn ctx() -> TickContext {
        TickContext {
            dt: 0.1,
            wave: 1,
            power_up: None,
        }
    }

    fn setup() -> (World, Entity, EconomyLedger, ChaCha8Rng) {
        let mut world = World::new();
        let path = PathModel::from_waypoints(vec![DVec2::ZERO, DVec2::new(600.0, 0.0)]);
        let enemy = world_setup::spawn_enemy(&mut world, &path, 4, EnemyType::Goblin, 1, None);
        (
            world,
            enemy,
            EconomyLedger::new(),
            ChaCha8Rng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_killing_hit_credits_reward() {
        let (mut world, enemy, mut ledger, mut rng) = setup();
        let gold_before = ledger.resources().gold;
        world_setup::spawn_projectile(
            &mut world,
            Position(DVec2::new(3.0, 0.0)),
            ProjectileAgent::new(1, enemy, 4, 100.0, 300.0),
        );
        let mut events = Vec::new();
        let mut buffer = Vec::new();
        run(&mut world, &mut ledger, &mut rng, &ctx(), &mut events, &mut buffer);

        assert!(matches!(events[0], SimEvent::ProjectileHit { enemy_id: 4, .. }));
        assert!(matches!(events[1], SimEvent::EnemyDefeated { enemy_id: 4, .. }));
        assert_eq!(ledger.resources().gold, gold_before + 20.0);
        assert_eq!(
            world.get::<&EnemyAgent>(enemy).unwrap().phase,
            EnemyPhase::Removed
        );
        assert_eq!(world.query::<&ProjectileAgent>().iter().count(), 0);
    }

    #[test]
    fn test_overkill_in_same_tick_is_a_miss() {
        let (mut world, enemy, mut ledger, mut rng) = setup();
        for tower_id in [1, 2] {
            world_setup::spawn_projectile(
                &mut world,
                Position(DVec2::new(1.0, 0.0)),
                ProjectileAgent::new(tower_id, enemy, 4, 60.0, 300.0),
            );
        }
        let mut events = Vec::new();
        run(&mut world, &mut ledger, &mut rng, &ctx(), &mut events, &mut Vec::new());

        let defeated = events
            .iter()
            .filter(|e| matches!(e, SimEvent::EnemyDefeated { .. }))
            .count();
        let missed = events
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileMissed { .. }))
            .count();
        assert_eq!(defeated, 1);
        assert_eq!(missed, 1);
    }

    #[test]
    fn test_vanished_target_discards_projectile() {
        let (mut world, enemy, mut ledger, mut rng) = setup();
        world_setup::spawn_projectile(
            &mut world,
            Position(DVec2::new(300.0, 0.0)),
            ProjectileAgent::new(1, enemy, 4, 10.0, 300.0),
        );
        world.despawn(enemy).unwrap();

        let mut events = Vec::new();
        run(&mut world, &mut ledger, &mut rng, &ctx(), &mut events, &mut Vec::new());
        assert_eq!(events, vec![SimEvent::ProjectileMissed {
                tower_id: 1,
                enemy_id: 4
            }]);
        assert_eq!(world.len(), 0);
    }
}
