//! Spawner system: moves due enemies from the wave queue onto the path.

use hecs::World;

use kingdom_core::events::SimEvent;

use crate::path::PathModel;
use crate::systems::TickContext;
use crate::wave::WaveDirector;
use crate::world_setup;

pub fn run(
    world: &mut World,
    path: &PathModel,
    waves: &mut WaveDirector,
    ctx: &TickContext,
    next_enemy_id: &mut u32,
    events: &mut Vec<SimEvent>,
) {
    for kind in waves.due_spawns(ctx.dt, events) {
        *next_enemy_id += 1;
        let enemy_id = *next_enemy_id;
        world_setup::spawn_enemy(world, path, enemy_id, kind, ctx.wave, ctx.power_up);
        events.push(SimEvent::EnemySpawned {
            enemy_id,
            enemy: kind,
        });
    }
}
