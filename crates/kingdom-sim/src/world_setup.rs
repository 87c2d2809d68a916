//! Entity factories and battlefield resets.

use hecs::{Entity, World};

use kingdom_core::enums::{EnemyType, PowerUp, TowerType};
use kingdom_core::types::Tile;

use crate::agents::{EnemyAgent, Position, ProjectileAgent, TowerAgent};
use crate::path::PathModel;

/// Spawn an enemy at the start of the path.
pub fn spawn_enemy(
    world: &mut World,
    path: &PathModel,
    id: u32,
    kind: EnemyType,
    wave: u32,
    power_up: Option<PowerUp>,
) -> Entity {
    world.spawn((
        Position(path.start()),
        EnemyAgent::new(id, kind, wave, power_up, path.total_length()),
    ))
}

/// Spawn a tower centered on its defense tile.
pub fn spawn_tower(world: &mut World, id: u32, kind: TowerType, tile: Tile, tier: u8) -> Entity {
    world.spawn((
        Position(tile.defense_center()),
        TowerAgent::new(id, kind, tile, tier),
    ))
}

pub fn spawn_projectile(world: &mut World, origin: Position, projectile: ProjectileAgent) -> Entity {
    world.spawn((origin, projectile))
}

/// Remove every enemy and projectile. Towers stay.
pub fn clear_battlefield(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    despawn_buffer.extend(world.query::<&EnemyAgent>().iter().map(|(entity, _)| entity));
    despawn_buffer.extend(
        world
            .query::<&ProjectileAgent>()
            .iter()
            .map(|(entity, _)| entity),
    );
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
