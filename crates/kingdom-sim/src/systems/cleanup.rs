//! Cleanup system: removes enemies that have died.

use hecs::{Entity, World};

use kingdom_core::enums::EnemyPhase;

use crate::agents::EnemyAgent;

/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, enemy) in world.query_mut::<&EnemyAgent>() {
        if enemy.phase == EnemyPhase::Removed {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
