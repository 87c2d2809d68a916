//! Fire control system: ready towers pick the closest enemy in range and
//! launch a projectile at it.

use hecs::World;

use kingdom_core::events::SimEvent;
use kingdom_core::tables::tower_spec;

use crate::agents::tower::TargetCandidate;
use crate::agents::{EnemyAgent, Position, ProjectileAgent, TowerAgent};
use crate::systems::TickContext;
use crate::world_setup;

pub fn run(world: &mut World, ctx: &TickContext, events: &mut Vec<SimEvent>) {
    let candidates: Vec<TargetCandidate> = world
        .query::<(&Position, &EnemyAgent)>()
        .iter()
        .filter(|(_, (_, enemy))| enemy.is_alive())
        .map(|(entity, (pos, enemy))| TargetCandidate {
            entity,
            enemy_id: enemy.id,
            position: pos.0,
        })
        .collect();

    let mut shots = Vec::new();
    for (_entity, tower) in world.query_mut::<&mut TowerAgent>() {
        if !tower.cool_down(ctx.dt) {
            continue;
        }
        let Some(target) = tower.choose_target(&candidates) else {
            continue;
        };
        tower.reset_cooldown();
        events.push(SimEvent::TowerFired {
            tower_id: tower.id,
            enemy_id: target.enemy_id,
        });
        shots.push((
            Position(tower.position()),
            ProjectileAgent::new(
                tower.id,
                target.entity,
                target.enemy_id,
                tower.damage(ctx.power_up),
                tower_spec(tower.kind).projectile_speed,
            ),
        ));
    }

    for (origin, projectile) in shots {
        world_setup::spawn_projectile(world, origin, projectile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use kingdom_core::enums::{EnemyType, PowerUp, TowerType};
    use kingdom_core::types::Tile;

    use crate::path::PathModel;

    fn ctx(power_up: Option<PowerUp>) -> TickContext {
        TickContext {
            dt: 0.1,
            wave: 1,
            power_up,
        }
    }

    fn path_past(tile: Tile) -> PathModel {
        let center = tile.defense_center();
        PathModel::from_waypoints(vec![
            DVec2::new(center.x - 30.0, center.y + 30.0),
            DVec2::new(center.x + 300.0, center.y + 30.0),
        ])
    }

    #[test]
    fn test_ready_tower_fires_once_per_interval() {
        let mut world = World::new();
        let tile = Tile::new(5, 5);
        let path = path_past(tile);
        world_setup::spawn_tower(&mut world, 1, TowerType::Archer, tile, 1);
        world_setup::spawn_enemy(&mut world, &path, 1, EnemyType::Goblin, 1, None);

        let mut events = Vec::new();
        run(&mut world, &ctx(None), &mut events);
        assert_eq!(
            events,
            vec![SimEvent::TowerFired {
                tower_id: 1,
                enemy_id: 1
            }]
        );
        assert_eq!(world.query::<&ProjectileAgent>().iter().count(), 1);

        events.clear();
        run(&mut world, &ctx(None), &mut events);
        assert!(events.is_empty(), "still cooling down");
    }

    #[test]
    fn test_projectile_carries_boosted_damage() {
        let mut world = World::new();
        let tile = Tile::new(5, 5);
        let path = path_past(tile);
        world_setup::spawn_tower(&mut world, 1, TowerType::Archer, tile, 1);
        world_setup::spawn_enemy(&mut world, &path, 1, EnemyType::Goblin, 1, None);

        run(&mut world, &ctx(Some(PowerUp::EnhancedDamage)), &mut Vec::new());
        let damage = world
            .query::<&ProjectileAgent>()
            .iter()
            .map(|(_, p)| p.damage)
            .next()
            .unwrap();
        assert_eq!(damage, 31.0);
    }

    #[test]
    fn test_no_target_keeps_tower_ready() {
        let mut world = World::new();
        let entity = world_setup::spawn_tower(&mut world, 1, TowerType::Magic, Tile::new(0, 0), 1);
        run(&mut world, &ctx(None), &mut Vec::new());
        assert_eq!(world.get::<&TowerAgent>(entity).unwrap().cooldown, 0.0);
    }
}
